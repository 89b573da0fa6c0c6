/// The kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    // Single Character tokens
    LeftCurly,
    RightCurly,
    LeftParen,
    RightParen,
    LeftSquare,
    RightSquare,
    Comma,
    Dot,
    Hyphen,
    Less,
    Pipe,
    Caret,
    SemiColon,

    // Compound Tokens
    Identifier,
    TypeReference,
    Number,
    RealNumber,
    CString,
    Assignment,
    Range,
    Ellipsis,

    // Keywords
    KwApplication,
    KwAutomatic,
    KwBegin,
    KwBit,
    KwBmpString,
    KwBoolean,
    KwCharacter,
    KwChoice,
    KwDefault,
    KwDefinitions,
    KwEnd,
    KwEnumerated,
    KwExplicit,
    KwExtensibility,
    KwFalse,
    KwGeneralizedTime,
    KwGeneralString,
    KwGraphicString,
    KwIA5String,
    KwIdentifier,
    KwImplicit,
    KwImplied,
    KwInteger,
    KwIntersection,
    KwISO646String,
    KwMax,
    KwMin,
    KwNull,
    KwNumericString,
    KwObject,
    KwOctet,
    KwOf,
    KwOptional,
    KwPrintableString,
    KwPrivate,
    KwReal,
    KwSequence,
    KwSet,
    KwSize,
    KwString,
    KwTags,
    KwTeletexString,
    KwT61String,
    KwTrue,
    KwUnion,
    KwUniversal,
    KwUniversalString,
    KwUTCTime,
    KwUTF8String,
    KwVideotexString,
    KwVisibleString,

    /// Marks the end of the token stream, always the last token returned by
    /// the lexer.
    Eof,
}

/// Data relating to a single lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token<'a> {
    /// The type of this token
    pub kind: TokenKind,

    /// The string value of the token, will be a valid string for the token kind
    /// so it can be parsed further, e.g. into a number.
    pub value: &'a str,

    /// Byte offset into the file that the token starts at.  The end location
    /// can be derived from this offset + the length of the value string.
    pub offset: usize,
}

/// String/Enum mapping for keywords
pub const KEYWORD_DATA: [(&str, TokenKind); 51] = [
    ("APPLICATION", TokenKind::KwApplication),
    ("AUTOMATIC", TokenKind::KwAutomatic),
    ("BEGIN", TokenKind::KwBegin),
    ("BIT", TokenKind::KwBit),
    ("BMPString", TokenKind::KwBmpString),
    ("BOOLEAN", TokenKind::KwBoolean),
    ("CHARACTER", TokenKind::KwCharacter),
    ("CHOICE", TokenKind::KwChoice),
    ("DEFAULT", TokenKind::KwDefault),
    ("DEFINITIONS", TokenKind::KwDefinitions),
    ("END", TokenKind::KwEnd),
    ("ENUMERATED", TokenKind::KwEnumerated),
    ("EXPLICIT", TokenKind::KwExplicit),
    ("EXTENSIBILITY", TokenKind::KwExtensibility),
    ("FALSE", TokenKind::KwFalse),
    ("GeneralizedTime", TokenKind::KwGeneralizedTime),
    ("GeneralString", TokenKind::KwGeneralString),
    ("GraphicString", TokenKind::KwGraphicString),
    ("IA5String", TokenKind::KwIA5String),
    ("IDENTIFIER", TokenKind::KwIdentifier),
    ("IMPLICIT", TokenKind::KwImplicit),
    ("IMPLIED", TokenKind::KwImplied),
    ("INTEGER", TokenKind::KwInteger),
    ("INTERSECTION", TokenKind::KwIntersection),
    ("ISO646String", TokenKind::KwISO646String),
    ("MAX", TokenKind::KwMax),
    ("MIN", TokenKind::KwMin),
    ("NULL", TokenKind::KwNull),
    ("NumericString", TokenKind::KwNumericString),
    ("OBJECT", TokenKind::KwObject),
    ("OCTET", TokenKind::KwOctet),
    ("OF", TokenKind::KwOf),
    ("OPTIONAL", TokenKind::KwOptional),
    ("PrintableString", TokenKind::KwPrintableString),
    ("PRIVATE", TokenKind::KwPrivate),
    ("REAL", TokenKind::KwReal),
    ("SEQUENCE", TokenKind::KwSequence),
    ("SET", TokenKind::KwSet),
    ("SIZE", TokenKind::KwSize),
    ("STRING", TokenKind::KwString),
    ("TAGS", TokenKind::KwTags),
    ("TeletexString", TokenKind::KwTeletexString),
    ("T61String", TokenKind::KwT61String),
    ("TRUE", TokenKind::KwTrue),
    ("UNION", TokenKind::KwUnion),
    ("UNIVERSAL", TokenKind::KwUniversal),
    ("UniversalString", TokenKind::KwUniversalString),
    ("UTCTime", TokenKind::KwUTCTime),
    ("UTF8String", TokenKind::KwUTF8String),
    ("VideotexString", TokenKind::KwVideotexString),
    ("VisibleString", TokenKind::KwVisibleString),
    // "ABSENT",
    // "ABSTRACT-SYNTAX",
    // "ALL",
    // "BY",
    // "CLASS",
    // "COMPONENT",
    // "COMPONENTS",
    // "CONSTRAINED",
    // "CONTAINING",
    // "EMBEDDED",
    // "ENCODED",
    // "EXCEPT",
    // "EXPORTS",
    // "EXTERNAL",
    // "FROM",
    // "IMPORTS",
    // "INCLUDES",
    // "INSTANCE",
    // "PATTERN",
    // "PDV",
    // "PRESENT",
    // "SYNTAX",
    // "WITH",
];
