use std::{collections::HashMap, str::CharIndices, sync::OnceLock};

use thiserror::Error;

use crate::{
    token::{self, Token, TokenKind},
    util::{Peek, Peekable},
};

/// State for converting a source string into a token stream
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// Iterator over all chars in the file
    chars: Peekable<CharIndices<'a>>,

    /// The original source text
    source: &'a str,
}

/// Any error that can be emitted while tokenizing a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum LexerError {
    /// A character that cannot start any token
    #[error("unexpected character {ch:?}")]
    UnexpectedChar { offset: usize, ch: char },

    /// A `/*` without a matching `*/`
    #[error("comment is never terminated")]
    NonTerminatedComment { offset: usize },

    /// A `"` without a matching closing `"`
    #[error("string literal is never terminated")]
    NonTerminatedString { offset: usize },

    /// Numbers other than zero cannot start with a zero digit
    #[error("number has a leading zero")]
    LeadingZero { offset: usize },

    /// The source text is not in unicode normalization form C
    #[error("source text is not in unicode normalization form C")]
    NotNormalized,
}

pub type Result<T, E = LexerError> = std::result::Result<T, E>;

impl LexerError {
    /// Byte offset of the error within the source, if it has one
    pub fn offset(&self) -> Option<usize> {
        match *self {
            LexerError::UnexpectedChar { offset, .. }
            | LexerError::NonTerminatedComment { offset }
            | LexerError::NonTerminatedString { offset }
            | LexerError::LeadingZero { offset } => Some(offset),
            LexerError::NotNormalized => None,
        }
    }
}

/// Tokenize a whole source file.  The returned list always ends with an
/// [`TokenKind::Eof`] token.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>> {
    Lexer::new(source).run()
}

impl<'a> Lexer<'a> {
    /// Create a new Lexer for a given source file.
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().n_peekable(),
            source,
        }
    }

    /// Get all tokens for the source file, stopping at the first error.
    pub fn run(mut self) -> Result<Vec<Token<'a>>> {
        if !unicode_normalization::is_nfc(self.source) {
            return Err(LexerError::NotNormalized);
        }

        let mut tokens = vec![];
        loop {
            self.skip_trivia()?;

            let Some(&(offset, c)) = self.chars.peek(0) else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    value: "",
                    offset: self.source.len(),
                });
                return Ok(tokens);
            };

            let tok = self.token(c, offset)?;
            for _ in tok.value.chars() {
                self.chars.next();
            }
            tokens.push(tok);
        }
    }

    /// Skip all whitespace and comments before the next token
    fn skip_trivia(&mut self) -> Result<()> {
        while let Some(&(offset, c)) = self.chars.peek(0) {
            match c {
                '-' => {
                    if !self.single_comment() {
                        break;
                    }
                }
                '/' => {
                    if !self.multi_comment(offset)? {
                        break;
                    }
                }
                _ if is_whitespace(c) => {
                    self.chars.next();
                }
                _ => break,
            }
        }

        Ok(())
    }

    /// Lex the token starting with character `c` at `offset`.  Does not consume
    /// any characters, the caller skips past the returned token's value.
    fn token(&mut self, c: char, offset: usize) -> Result<Token<'a>> {
        let tok = match c {
            '{' => self.simple_token(TokenKind::LeftCurly, offset),
            '}' => self.simple_token(TokenKind::RightCurly, offset),
            '(' => self.simple_token(TokenKind::LeftParen, offset),
            ')' => self.simple_token(TokenKind::RightParen, offset),
            '[' => self.simple_token(TokenKind::LeftSquare, offset),
            ']' => self.simple_token(TokenKind::RightSquare, offset),
            ',' => self.simple_token(TokenKind::Comma, offset),
            '-' => self.simple_token(TokenKind::Hyphen, offset),
            '<' => self.simple_token(TokenKind::Less, offset),
            '|' => self.simple_token(TokenKind::Pipe, offset),
            '^' => self.simple_token(TokenKind::Caret, offset),
            ';' => self.simple_token(TokenKind::SemiColon, offset),
            ':' => self.multi_token(TokenKind::Assignment, offset, "::="),
            '.' => self
                .multi_token(TokenKind::Ellipsis, offset, "...")
                .or_else(|| self.multi_token(TokenKind::Range, offset, ".."))
                .or_else(|| self.simple_token(TokenKind::Dot, offset)),
            '"' => Some(self.cstring(offset)?),
            _ if c.is_ascii_digit() => Some(self.number(offset)?),
            _ if c.is_ascii_alphabetic() => Some(self.identifier(c, offset)),
            _ => None,
        };

        tok.ok_or(LexerError::UnexpectedChar { offset, ch: c })
    }

    /// Return a 1 character token
    fn simple_token(&self, kind: TokenKind, offset: usize) -> Option<Token<'a>> {
        let value = &self.source[offset..];
        let first = value.chars().next()?;
        Some(Token {
            kind,
            value: &value[..first.len_utf8()],
            offset,
        })
    }

    /// Try to return a multi-character token
    fn multi_token(&self, kind: TokenKind, offset: usize, value: &str) -> Option<Token<'a>> {
        let tok_value = &self.source[offset..];

        if !tok_value.starts_with(value) {
            return None;
        }

        Some(Token {
            kind,
            value: &tok_value[..value.len()],
            offset,
        })
    }

    /// Skip a single line comment, which is text between pairs of two hyphens
    /// or between two hyphens and the end of the line.  Returns false without
    /// consuming anything if the next characters do not start a comment.
    fn single_comment(&mut self) -> bool {
        if !matches!(self.chars.peek(1), Some((_, '-'))) {
            return false;
        }
        self.chars.next();
        self.chars.next();

        while let Some(&(_, next)) = self.chars.peek(0) {
            if is_newline(next) {
                break;
            }
            self.chars.next();

            if next == '-' && matches!(self.chars.peek(0), Some((_, '-'))) {
                self.chars.next();
                break;
            }
        }

        true
    }

    /// Skip a multi line comment, which is text between `/*` and `*/`.  The
    /// comment ends when a matching `*/` has been found for every `/*`
    /// encountered.
    fn multi_comment(&mut self, offset: usize) -> Result<bool> {
        if !matches!(self.chars.peek(1), Some((_, '*'))) {
            return Ok(false);
        }
        self.chars.next();
        self.chars.next();

        let mut depth = 1;
        while let Some((_, c)) = self.chars.next() {
            if c == '/' && matches!(self.chars.peek(0), Some((_, '*'))) {
                depth += 1;
                self.chars.next();
            } else if c == '*' && matches!(self.chars.peek(0), Some((_, '/'))) {
                depth -= 1;
                self.chars.next();

                if depth == 0 {
                    return Ok(true);
                }
            }
        }

        Err(LexerError::NonTerminatedComment { offset })
    }

    /// Parse an identifier, type reference or keyword.  Hyphens are allowed
    /// within the name as long as they are followed by a letter or digit.
    fn identifier(&mut self, first: char, offset: usize) -> Token<'a> {
        let mut len = 1;
        while let Some(&(_, c)) = self.chars.peek(len) {
            if c.is_ascii_alphanumeric() {
                len += 1;
                continue;
            }

            if c == '-' {
                if let Some(&(_, c)) = self.chars.peek(len + 1) {
                    if c.is_ascii_alphanumeric() {
                        len += 2;
                        continue;
                    }
                }
            }

            break;
        }

        let value = &self.source[offset..offset + len];
        let ident_kind = if first.is_ascii_lowercase() {
            TokenKind::Identifier
        } else {
            TokenKind::TypeReference
        };
        let kind = keywords().get(value).copied().unwrap_or(ident_kind);

        Token {
            kind,
            value,
            offset,
        }
    }

    /// Parse a number `([1-9][0-9]*)|0` or a real number with a fraction
    /// and/or an exponent, `1.5`, `2e10`, `3.25E-2`.
    fn number(&mut self, offset: usize) -> Result<Token<'a>> {
        let mut len = self.digits(0);
        let mut kind = TokenKind::Number;

        if len > 1 && self.source[offset..].starts_with('0') {
            return Err(LexerError::LeadingZero { offset });
        }

        // `1..5` is a range, not a real number
        if matches!(self.chars.peek(len), Some((_, '.')))
            && matches!(self.chars.peek(len + 1), Some((_, c)) if c.is_ascii_digit())
        {
            kind = TokenKind::RealNumber;
            len = self.digits(len + 1);
        }

        if matches!(self.chars.peek(len), Some((_, 'e' | 'E'))) {
            let sign = usize::from(matches!(self.chars.peek(len + 1), Some((_, '-'))));
            if matches!(self.chars.peek(len + 1 + sign), Some((_, c)) if c.is_ascii_digit()) {
                kind = TokenKind::RealNumber;
                len = self.digits(len + 1 + sign);
            }
        }

        Ok(Token {
            kind,
            value: &self.source[offset..offset + len],
            offset,
        })
    }

    /// Count ascii digits starting `start` characters ahead, returning the
    /// position after the last digit.
    fn digits(&mut self, start: usize) -> usize {
        let mut len = start;
        while matches!(self.chars.peek(len), Some((_, c)) if c.is_ascii_digit()) {
            len += 1;
        }
        len
    }

    /// Parse a character string `"..."`, where `""` inside the string is an
    /// escaped quote.  The token value includes both quotes.
    fn cstring(&mut self, offset: usize) -> Result<Token<'a>> {
        let mut n = 1;
        let mut bytes = 1;
        loop {
            let Some(&(_, c)) = self.chars.peek(n) else {
                return Err(LexerError::NonTerminatedString { offset });
            };
            n += 1;
            bytes += c.len_utf8();

            if c == '"' {
                if matches!(self.chars.peek(n), Some((_, '"'))) {
                    n += 1;
                    bytes += 1;
                    continue;
                }
                break;
            }
        }

        Ok(Token {
            kind: TokenKind::CString,
            value: &self.source[offset..offset + bytes],
            offset,
        })
    }
}

/// Is the character any valid whitespace
fn is_whitespace(c: char) -> bool {
    // A0 = Non breaking space
    "\t \u{A0}".contains(c) || is_newline(c)
}

/// Is the character a valid newline character
fn is_newline(c: char) -> bool {
    // 0B = Vertical Tab
    // 0C = Form Feed
    "\n\x0B\x0C\r".contains(c)
}

/// Get a mapping from keyword strings to their token kind
fn keywords() -> &'static HashMap<&'static str, TokenKind> {
    static KEYWORDS: OnceLock<HashMap<&'static str, TokenKind>> = OnceLock::new();
    KEYWORDS.get_or_init(|| HashMap::from(token::KEYWORD_DATA))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn module_header() {
        assert_eq!(
            kinds("My-Module DEFINITIONS IMPLICIT TAGS ::= BEGIN END"),
            vec![
                TokenKind::TypeReference,
                TokenKind::KwDefinitions,
                TokenKind::KwImplicit,
                TokenKind::KwTags,
                TokenKind::Assignment,
                TokenKind::KwBegin,
                TokenKind::KwEnd,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn hyphenated_names() {
        let tokens = tokenize("My-ASN1-ModuleName my-field").unwrap();
        assert_eq!(tokens[0].value, "My-ASN1-ModuleName");
        assert_eq!(tokens[0].kind, TokenKind::TypeReference);
        assert_eq!(tokens[1].value, "my-field");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn comments_are_skipped() {
        let source = "a -- one -- b -- to the end of line\n c /* outer /* inner */ */ d";
        let values: Vec<_> = tokenize(source)
            .unwrap()
            .iter()
            .map(|t| t.value)
            .collect();
        assert_eq!(values, vec!["a", "b", "c", "d", ""]);
    }

    #[test]
    fn numbers_and_ranges() {
        assert_eq!(
            kinds("(32..MAX) 3.14 -1 1e5 ..."),
            vec![
                TokenKind::LeftParen,
                TokenKind::Number,
                TokenKind::Range,
                TokenKind::KwMax,
                TokenKind::RightParen,
                TokenKind::RealNumber,
                TokenKind::Hyphen,
                TokenKind::Number,
                TokenKind::RealNumber,
                TokenKind::Ellipsis,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn cstring_with_escaped_quote() {
        let tokens = tokenize(r#"x ::= "say ""hi""""#).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::CString);
        assert_eq!(tokens[2].value, r#""say ""hi""""#);
    }

    #[test]
    fn offsets() {
        let tokens = tokenize("A ::= BOOLEAN").unwrap();
        let offsets: Vec<_> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 2, 6, 13]);
    }

    #[test]
    fn invalid_character() {
        assert_eq!(
            tokenize("A ::= # BOOLEAN"),
            Err(LexerError::UnexpectedChar { offset: 6, ch: '#' })
        );
    }

    #[test]
    fn unterminated() {
        assert_eq!(
            tokenize("A /* never closed"),
            Err(LexerError::NonTerminatedComment { offset: 2 })
        );
        assert_eq!(
            tokenize("a ::= \"open"),
            Err(LexerError::NonTerminatedString { offset: 6 })
        );
    }

    #[test]
    fn leading_zero() {
        assert_eq!(tokenize("007"), Err(LexerError::LeadingZero { offset: 0 }));
    }

    #[test]
    fn not_normalized() {
        // "e" followed by a combining acute accent is NFD
        assert_eq!(
            tokenize("-- caf\u{65}\u{301}\nA"),
            Err(LexerError::NotNormalized)
        );
    }
}
