//! Markup lexer.
//!
//! Scans the source once, left to right, and hands `Event`s to a callback.
//! Text runs are located with `memchr`, so the per-byte work only happens
//! inside tags.
//!
//! # Example
//!
//! ```
//! use typewriter_core::{Event, Lexer};
//!
//! let mut names = Vec::new();
//! Lexer::new("<p>Hi <em>there</em></p>").parse(|event| {
//!     if let Event::ElementStart { name, .. } = event {
//!         names.push(name.into_owned());
//!     }
//! });
//! assert_eq!(names, ["p", "em"]);
//! ```
//!
//! The lexer never panics. On malformed input it emits `Event::Error`,
//! skips to the next `>` (or end of input), and carries on.

use std::borrow::Cow;

use memchr::{memchr, memmem};

use crate::error::ParseErrorCode;
use crate::event::Event;
use crate::html;
use crate::span::Span;

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after the start tag of `<script>`, `<style>`, `<textarea>` or `<title>`
    raw_text: Option<Cow<'a, str>>,
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text: None,
        }
    }

    /// Lex the whole input, calling `emit` for each event in source order.
    pub fn parse<F>(mut self, mut emit: F)
    where
        F: FnMut(Event<'a>),
    {
        while self.pos < self.input.len() {
            if let Some(name) = self.raw_text.take() {
                self.lex_raw_text(&name, &mut emit);
                continue;
            }

            let rest = &self.input.as_bytes()[self.pos..];
            match memchr(b'<', rest) {
                Some(0) => self.lex_markup(&mut emit),
                Some(i) => self.emit_text(self.pos + i, &mut emit),
                None => self.emit_text(self.input.len(), &mut emit),
            }
        }
    }

    /// Convenience: collect all events into a Vec.
    pub fn events(self) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        self.parse(|e| events.push(e));
        events
    }

    // ---- helpers ----

    #[inline]
    fn byte(&self, at: usize) -> Option<u8> {
        self.input.as_bytes().get(at).copied()
    }

    #[inline]
    fn char_at(&self, at: usize) -> Option<char> {
        self.input.get(at..).and_then(|s| s.chars().next())
    }

    fn skip_space(&self, mut at: usize) -> usize {
        while self.byte(at).is_some_and(is_space) {
            at += 1;
        }
        at
    }

    /// End of a name starting at `at` (first char already validated).
    fn name_end(&self, at: usize) -> usize {
        let rest = &self.input[at..];
        let mut chars = rest.char_indices();
        chars.next();
        chars
            .find(|&(_, c)| !html::is_name_continue(c))
            .map_or(self.input.len(), |(i, _)| at + i)
    }

    fn emit_text<F: FnMut(Event<'a>)>(&mut self, end: usize, emit: &mut F) {
        emit(Event::Text {
            content: &self.input[self.pos..end],
            span: Span::new(self.pos, end),
        });
        self.pos = end;
    }

    fn error<F: FnMut(Event<'a>)>(&self, code: ParseErrorCode, start: usize, end: usize, emit: &mut F) {
        emit(Event::Error {
            code,
            span: Span::new(start, end),
        });
    }

    /// Skip past the next `>` at or after `from` (or to end of input).
    fn resync(&mut self, from: usize) {
        self.pos = match memchr(b'>', &self.input.as_bytes()[from..]) {
            Some(i) => from + i + 1,
            None => self.input.len(),
        };
    }

    // ---- markup ----

    fn lex_markup<F: FnMut(Event<'a>)>(&mut self, emit: &mut F) {
        let start = self.pos;
        let rest = &self.input[start..];

        if rest.starts_with("<!--") {
            self.lex_comment(emit);
        } else if rest.starts_with("<!") {
            self.lex_declaration(emit);
        } else if rest.starts_with("</") {
            self.lex_end_tag(emit);
        } else if self.char_at(start + 1).is_some_and(html::is_tag_name_start) {
            self.lex_start_tag(emit);
        } else {
            // Bare `<` that opens nothing
            self.error(ParseErrorCode::InvalidTagName, start, start + 1, emit);
            self.pos = start + 1;
        }
    }

    fn lex_comment<F: FnMut(Event<'a>)>(&mut self, emit: &mut F) {
        let start = self.pos;
        let body = start + 4;
        match memmem::find(&self.input.as_bytes()[body..], b"-->") {
            Some(i) => {
                emit(Event::Comment {
                    content: &self.input[body..body + i],
                    span: Span::new(start, body + i + 3),
                });
                self.pos = body + i + 3;
            }
            None => {
                self.error(ParseErrorCode::UnclosedComment, start, self.input.len(), emit);
                self.pos = self.input.len();
            }
        }
    }

    fn lex_declaration<F: FnMut(Event<'a>)>(&mut self, emit: &mut F) {
        let start = self.pos;
        let body = start + 2;
        match memchr(b'>', &self.input.as_bytes()[body..]) {
            Some(i) => {
                emit(Event::Doctype {
                    content: &self.input[body..body + i],
                    span: Span::new(start, body + i + 1),
                });
                self.pos = body + i + 1;
            }
            None => {
                self.error(ParseErrorCode::UnclosedTag, start, self.input.len(), emit);
                self.pos = self.input.len();
            }
        }
    }

    fn lex_end_tag<F: FnMut(Event<'a>)>(&mut self, emit: &mut F) {
        let start = self.pos;
        let name_start = start + 2;

        if !self.char_at(name_start).is_some_and(html::is_tag_name_start) {
            self.error(ParseErrorCode::InvalidTagName, start, name_start, emit);
            self.resync(name_start);
            return;
        }

        let name_end = self.name_end(name_start);
        let close = self.skip_space(name_end);
        match self.byte(close) {
            Some(b'>') => {
                emit(Event::ElementEnd {
                    name: html::lowercase(&self.input[name_start..name_end]),
                    span: Span::new(start, close + 1),
                });
                self.pos = close + 1;
            }
            Some(_) => {
                self.error(ParseErrorCode::InvalidTagName, start, close, emit);
                self.resync(close);
            }
            None => {
                self.error(ParseErrorCode::UnclosedTag, start, self.input.len(), emit);
                self.pos = self.input.len();
            }
        }
    }

    fn lex_start_tag<F: FnMut(Event<'a>)>(&mut self, emit: &mut F) {
        let start = self.pos;
        let name_end = self.name_end(start + 1);
        let name = html::lowercase(&self.input[start + 1..name_end]);
        emit(Event::ElementStart {
            name: name.clone(),
            span: Span::new(start, name_end),
        });

        let mut at = name_end;
        loop {
            at = self.skip_space(at);
            match self.byte(at) {
                None => {
                    self.error(ParseErrorCode::UnclosedTag, start, self.input.len(), emit);
                    self.pos = self.input.len();
                    return;
                }
                Some(b'>') => {
                    emit(Event::StartTagEnd {
                        self_closing: false,
                        span: Span::new(at, at + 1),
                    });
                    self.pos = at + 1;
                    if html::is_verbatim(&name) {
                        self.raw_text = Some(name);
                    }
                    return;
                }
                Some(b'/') if self.byte(at + 1) == Some(b'>') => {
                    emit(Event::StartTagEnd {
                        self_closing: true,
                        span: Span::new(at, at + 2),
                    });
                    self.pos = at + 2;
                    return;
                }
                Some(b'/') => at += 1,
                Some(_) => match self.lex_attribute(at, emit) {
                    Some(next) => at = next,
                    None => return,
                },
            }
        }
    }

    /// Lex one attribute at `at`. Returns the position after it, or None when
    /// an error was emitted and `self.pos` already resynchronised.
    fn lex_attribute<F: FnMut(Event<'a>)>(&mut self, at: usize, emit: &mut F) -> Option<usize> {
        if !self.char_at(at).is_some_and(html::is_attr_name_start) {
            self.error(ParseErrorCode::InvalidAttributeName, at, at + 1, emit);
            self.resync(at);
            return None;
        }

        let name_end = self.name_end(at);
        let name = html::lowercase(&self.input[at..name_end]);

        let eq = self.skip_space(name_end);
        if self.byte(eq) != Some(b'=') {
            emit(Event::Attribute {
                name,
                value: None,
                span: Span::new(at, name_end),
            });
            return Some(name_end);
        }

        let value_start = self.skip_space(eq + 1);
        let (value, end) = match self.byte(value_start) {
            Some(quote @ (b'"' | b'\'')) => {
                let body = value_start + 1;
                match memchr(quote, &self.input.as_bytes()[body..]) {
                    Some(i) => (&self.input[body..body + i], body + i + 1),
                    None => {
                        self.error(ParseErrorCode::UnclosedQuote, value_start, self.input.len(), emit);
                        self.pos = self.input.len();
                        return None;
                    }
                }
            }
            _ => {
                let bytes = self.input.as_bytes();
                let mut end = value_start;
                while end < bytes.len() && !is_space(bytes[end]) && bytes[end] != b'>' {
                    end += 1;
                }
                (&self.input[value_start..end], end)
            }
        };

        emit(Event::Attribute {
            name,
            value: Some(value),
            span: Span::new(at, end),
        });
        Some(end)
    }

    /// Content of a raw-text element, up to its end tag (not consumed).
    fn lex_raw_text<F: FnMut(Event<'a>)>(&mut self, name: &str, emit: &mut F) {
        let bytes = self.input.as_bytes();
        let mut search = self.pos;
        let end = loop {
            let Some(i) = memchr(b'<', &bytes[search..]) else {
                break self.input.len();
            };
            let lt = search + i;
            let tag_end = lt + 2 + name.len();
            if bytes.get(lt + 1) == Some(&b'/')
                && bytes
                    .get(lt + 2..tag_end)
                    .is_some_and(|n| n.eq_ignore_ascii_case(name.as_bytes()))
                && bytes.get(tag_end).map_or(true, |&b| is_space(b) || b == b'>' || b == b'/')
            {
                break lt;
            }
            search = lt + 1;
        };

        if end > self.pos {
            self.emit_text(end, emit);
        }
    }
}
