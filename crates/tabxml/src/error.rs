//! Error types for tabxml

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    InvalidEntity,
    InvalidUtf8,
    DuplicateAttribute { name: String },
    MismatchedTag { expected: String, found: String },
    UnterminatedMarkup,
    MissingRow { path: String },
    Io { path: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::InvalidEntity => write!(f, "invalid entity"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::DuplicateAttribute { name } => {
                write!(f, "duplicate attribute: {name}")
            }
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected {expected}, found {found}")
            }
            Self::UnterminatedMarkup => write!(f, "unterminated markup"),
            Self::MissingRow { path } => {
                write!(f, "{path} has a header row but no data row")
            }
            Self::Io { path } => write!(f, "i/o failure on {path}"),
        }
    }
}

/// Main error type for tabxml
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    /// Create an i/o error carrying the offending path
    pub fn io(path: &Path, source: &std::io::Error) -> Self {
        Self::with_message(
            ErrorKind::Io {
                path: path.display().to_string(),
            },
            Span::empty(),
            format!("{}: {source}", path.display()),
        )
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self.kind, ErrorKind::Io { .. } | ErrorKind::MissingRow { .. }) {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

/// Result type alias for tabxml
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, 0, 1, 1);
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
    }

    #[test]
    fn test_error_display() {
        let err = Error::at(ErrorKind::UnterminatedMarkup, 10, 2, 5);
        let display = err.to_string();
        assert!(display.contains("error at 2:5"));
        assert!(display.contains("unterminated markup"));
    }

    #[test]
    fn test_missing_row_display() {
        let err = Error::new(
            ErrorKind::MissingRow {
                path: "mapping.csv".to_string(),
            },
            Span::empty(),
        );
        assert_eq!(err.to_string(), "mapping.csv has a header row but no data row");
    }

    #[test]
    fn test_io_error_carries_path() {
        let io = std::io::Error::other("denied");
        let err = Error::io(Path::new("/tmp/base.xml"), &io);
        assert!(err.to_string().contains("/tmp/base.xml"));
    }
}
