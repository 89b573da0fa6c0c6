use std::{error::Error as StdError, fmt::Display, ops::Range};

use crate::{AnalysisError, CodegenError, Error, LexerError, ParserError};

/// Any error reported by the compiler, in a form that can be shown against
/// the source text.  Every diagnostic is fatal.
#[derive(Debug)]
pub struct Diagnostic {
    /// Unique error code reference
    pub error_code: String,

    /// Name of the diagnostic
    pub name: String,

    /// All labels with information about this diagnostic
    pub labels: Vec<Label>,
}

/// A message attached to part of the source file
#[derive(Debug)]
pub struct Label {
    /// Location within the source file that the diagnostic should be shown at.
    /// If the range is present but empty, that indicates a single character
    /// position rather than a range of characters.
    /// The range is a byte range into the source string, not a code point or
    /// character range.
    pub location: Option<Range<usize>>,

    /// The message to display to the user.
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub(crate) fn error(code: impl Into<String>) -> Self {
        Diagnostic {
            error_code: code.into(),
            name: String::new(),
            labels: vec![],
        }
    }

    /// Set the descriptive name of an error
    pub(crate) fn name(self, value: impl Into<String>) -> Self {
        Self {
            name: value.into(),
            ..self
        }
    }

    /// Add a label to the diagnostic
    pub(crate) fn label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }
}

impl Label {
    /// Create a new source label
    pub(crate) fn new() -> Label {
        Label {
            location: None,
            message: String::new(),
        }
    }

    /// Set the message for this label
    pub(crate) fn message(self, value: impl Into<String>) -> Self {
        Self {
            message: value.into(),
            ..self
        }
    }

    /// Set the location within the source file for this label
    pub fn loc(self, loc: Range<usize>) -> Self {
        Self {
            location: Some(loc),
            ..self
        }
    }

    /// A label on a name starting at `offset`
    fn name(offset: usize, name: &str) -> Self {
        Label::new().loc(offset..offset + name.len())
    }
}

impl From<&Error> for Diagnostic {
    fn from(value: &Error) -> Self {
        match value {
            Error::Lex(err) => lexer(err),
            Error::Syntax(err) => parser(err),
            Error::Resolution(err) | Error::Unsupported(err) => analysis(err),
            Error::Codegen(err) => codegen(err),
        }
    }
}

fn lexer(err: &LexerError) -> Diagnostic {
    let code = match err {
        LexerError::UnexpectedChar { .. } => "E101",
        LexerError::NonTerminatedComment { .. } => "E102",
        LexerError::NonTerminatedString { .. } => "E103",
        LexerError::LeadingZero { .. } => "E104",
        LexerError::NotNormalized => "E105",
    };

    let diagnostic = Diagnostic::error(code).name(err.to_string());
    match err.offset() {
        Some(offset) => diagnostic.label(Label::new().loc(offset..offset + 1).message(err.to_string())),
        None => diagnostic.label("normalise the file to NFC before compiling it"),
    }
}

fn parser(err: &ParserError) -> Diagnostic {
    let code = match err {
        ParserError::Expected { .. } => "E201",
        ParserError::DepthExceeded { .. } => "E202",
        ParserError::IntegerOverflow { .. } => "E203",
    };

    let offset = err.offset();
    let message = match err {
        ParserError::Expected { expected, .. } => format!("expected {expected}"),
        _ => err.to_string(),
    };

    Diagnostic::error(code)
        .name(err.to_string())
        .label(Label::new().loc(offset..offset).message(message))
}

fn analysis(err: &AnalysisError) -> Diagnostic {
    let code = match err {
        AnalysisError::Duplicate { .. } => "E301",
        AnalysisError::Undefined { .. } => "E302",
        AnalysisError::WrongNamespace { .. } => "E303",
        AnalysisError::Circular { .. } => "E304",
        AnalysisError::TypeMismatch { .. } => "E305",
        AnalysisError::DepthExceeded { .. } => "E306",
        AnalysisError::Unsupported { .. } => "E401",
    };

    let mut diagnostic = Diagnostic::error(code)
        .name(err.to_string())
        .label(Label::name(err.offset(), err.name()).message(err.to_string()));

    if let AnalysisError::Duplicate { name, first, .. } = err {
        diagnostic = diagnostic.label(Label::name(*first, name).message("first defined here"));
    }

    diagnostic
}

fn codegen(err: &CodegenError) -> Diagnostic {
    let code = match err {
        CodegenError::NameCollision { .. } => "E501",
        CodegenError::Fmt(_) => "E502",
    };

    Diagnostic::error(code).name(err.to_string())
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {}: {}", self.error_code, self.name)?;

        for label in &self.labels {
            writeln!(f)?;
            write!(f, "\tError")?;
            if let Some(location) = &label.location {
                write!(f, " [{}..{}]", location.start, location.end)?;
            }
            write!(f, ": {}", label.message)?;
        }

        Ok(())
    }
}

impl StdError for Diagnostic {}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::new().message(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::AsnCompiler;

    use super::*;

    fn diagnose(source: &str) -> Diagnostic {
        let err = AsnCompiler::new().compile_to_string(source).unwrap_err();
        Diagnostic::from(&err)
    }

    #[test]
    fn syntax_error_points_at_token() {
        let diagnostic = diagnose("M DEFINITIONS ::= BEGIN A ::= END");
        assert_eq!(diagnostic.error_code, "E201");
        assert_eq!(diagnostic.labels[0].location, Some(30..30));
    }

    #[test]
    fn duplicate_has_two_labels() {
        let diagnostic = diagnose("M DEFINITIONS ::= BEGIN Ab ::= BOOLEAN Ab ::= REAL END");
        assert_eq!(diagnostic.error_code, "E301");
        assert_eq!(diagnostic.labels[0].location, Some(39..41));
        assert_eq!(diagnostic.labels[1].location, Some(24..26));
        assert_eq!(diagnostic.labels[1].message, "first defined here");
    }

    #[test]
    fn unsupported_code() {
        let diagnostic = diagnose("M DEFINITIONS ::= BEGIN C ::= CHOICE { a BOOLEAN } END");
        assert_eq!(diagnostic.error_code, "E401");
        assert!(diagnostic.to_string().starts_with("Error E401: CHOICE is not supported"));
    }
}
