//! Lexer events - the core output of the markup lexer.
//!
//! This is a SAX-style event model: events are emitted as the lexer
//! encounters syntax, with no accumulation. Elements are represented
//! by start/end event pairs.
//!
//! A start tag `<a href="/x" hidden>` emits:
//! ```text
//! ElementStart { name: "a" }
//! Attribute { name: "href", value: Some("/x") }
//! Attribute { name: "hidden", value: None }
//! StartTagEnd { self_closing: false }
//! ```
//!
//! Names are borrowed from the source when already lower-case.

use std::borrow::Cow;

use crate::error::ParseErrorCode;
use crate::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    // ========== Structure Events ==========

    /// Start tag opened: `<name`
    ElementStart {
        name: Cow<'a, str>,
        span: Span,
    },

    /// Attribute inside a start tag. `value` is None for `<input disabled>`.
    Attribute {
        name: Cow<'a, str>,
        value: Option<&'a str>,
        span: Span,
    },

    /// Start tag closed: `>` or `/>`
    StartTagEnd {
        self_closing: bool,
        span: Span,
    },

    /// End tag: `</name>`
    ElementEnd {
        name: Cow<'a, str>,
        span: Span,
    },

    // ========== Content Events ==========

    /// Text content, verbatim (character references are not decoded)
    Text {
        content: &'a str,
        span: Span,
    },

    /// Comment: `<!-- content -->`
    Comment {
        content: &'a str,
        span: Span,
    },

    /// Doctype or other `<!...>` declaration
    Doctype {
        content: &'a str,
        span: Span,
    },

    // ========== Error Events ==========

    /// Lex error (the lexer resynchronises and continues after emitting this)
    Error {
        code: ParseErrorCode,
        span: Span,
    },
}

impl<'a> Event<'a> {
    /// Get the span for this event.
    pub fn span(&self) -> Span {
        match self {
            Event::ElementStart { span, .. } => *span,
            Event::Attribute { span, .. } => *span,
            Event::StartTagEnd { span, .. } => *span,
            Event::ElementEnd { span, .. } => *span,
            Event::Text { span, .. } => *span,
            Event::Comment { span, .. } => *span,
            Event::Doctype { span, .. } => *span,
            Event::Error { span, .. } => *span,
        }
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error { .. })
    }
}
