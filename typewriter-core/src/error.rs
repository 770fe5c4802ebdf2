//! Parse errors.

use crate::span::Span;

/// Error codes for malformed markup.
///
/// Carried by `Event::Error` so the lexer can keep going, and by
/// `ParseError` once the tree builder gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ParseErrorCode {
    /// `<` opened a tag that never reached `>`
    UnclosedTag = 0,
    /// `<!--` without `-->`
    UnclosedComment,
    /// Quoted attribute value without its closing quote
    UnclosedQuote,
    /// Tag name missing or starting with a non-letter
    InvalidTagName,
    /// Attribute name with a forbidden character
    InvalidAttributeName,
    /// End tag with no open element
    UnexpectedEndTag,
    /// End tag that does not match the innermost open element
    MismatchedEndTag,
    /// Element still open at end of input
    UnclosedElement,
    /// End tag for a void element (`</br>`)
    VoidEndTag,
    /// Input bytes are not valid UTF-8
    InvalidUtf8,
}

impl ParseErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnclosedTag => "unclosed tag",
            Self::UnclosedComment => "unclosed comment",
            Self::UnclosedQuote => "unclosed quote",
            Self::InvalidTagName => "invalid tag name",
            Self::InvalidAttributeName => "invalid attribute name",
            Self::UnexpectedEndTag => "unexpected end tag",
            Self::MismatchedEndTag => "mismatched end tag",
            Self::UnclosedElement => "unclosed element",
            Self::VoidEndTag => "end tag for void element",
            Self::InvalidUtf8 => "invalid utf-8",
        }
    }
}

/// Error returned when markup is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} at {span}", code.message())]
pub struct ParseError {
    pub code: ParseErrorCode,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ParseErrorCode, span: Span) -> Self {
        Self { code, span }
    }
}
