//! Reveal units - the atoms of the typewriter effect.
//!
//! A document is flattened by a depth-first, pre-order walk: an element
//! contributes its opening tag, then its children, then its closing tag.
//! Text nodes contribute one unit per character (`Granularity::Character`)
//! or one unit for the whole node (`Granularity::Node`).
//!
//! Concatenating a sequence in order reproduces the source markup, up to
//! these normalizations:
//!
//! - tag and attribute names are lower-cased
//! - attribute values are always double-quoted, `"` inside becomes `&quot;`,
//!   and valueless attributes are written `name=""`
//! - void elements (`<br>`, `<img>`) have no closing tag and `<br/>` becomes `<br>`
//! - `<x/>` on a non-void element becomes `<x></x>`
//! - only the first of several same-named attributes is kept
//! - comments and doctypes are dropped
//!
//! ```
//! use typewriter_core::{tokenize, Granularity};
//!
//! let units = tokenize("<p>Hi</p>", Granularity::Character).unwrap();
//! assert_eq!(units.as_strs(), ["<p>", "H", "i", "</p>"]);
//!
//! let units = tokenize("<p>Hi</p>", Granularity::Node).unwrap();
//! assert_eq!(units.as_strs(), ["<p>", "Hi", "</p>"]);
//! ```

use std::fmt;

use tracing::debug;

use crate::error::ParseError;
use crate::html;
use crate::tree::{Document, ElementView, Node, NodeKind};

/// How text nodes are split into units. Tags are always whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Granularity {
    /// One unit per character (a character reference counts as one).
    #[default]
    Character,
    /// One unit per text node.
    Node,
}

/// One atomic string appended per tick.
///
/// Text units borrow from the source markup; tags are re-serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealUnit<'a> {
    /// `<name attr="value">`
    OpenTag(String),
    /// `</name>`
    CloseTag(String),
    /// A single character, or one complete character reference like `&amp;`
    Char(&'a str),
    /// The whole content of a text node
    Text(&'a str),
}

impl<'a> RevealUnit<'a> {
    pub fn as_str(&self) -> &str {
        match self {
            RevealUnit::OpenTag(s) | RevealUnit::CloseTag(s) => s.as_str(),
            RevealUnit::Char(s) | RevealUnit::Text(s) => *s,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, RevealUnit::OpenTag(_) | RevealUnit::CloseTag(_))
    }

    /// Element name of a tag unit.
    pub fn tag_name(&self) -> Option<&str> {
        let inner = match self {
            RevealUnit::OpenTag(s) => s.strip_prefix('<')?,
            RevealUnit::CloseTag(s) => s.strip_prefix("</")?,
            _ => return None,
        };
        let end = inner.find([' ', '>']).unwrap_or(inner.len());
        Some(&inner[..end])
    }
}

impl fmt::Display for RevealUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, immutable list of units for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevealSequence<'a> {
    units: Vec<RevealUnit<'a>>,
}

impl<'a> RevealSequence<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&RevealUnit<'a>> {
        self.units.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RevealUnit<'a>> {
        self.units.iter()
    }

    pub fn units(&self) -> &[RevealUnit<'a>] {
        &self.units
    }

    /// Unit strings, in order.
    pub fn as_strs(&self) -> Vec<&str> {
        self.units.iter().map(RevealUnit::as_str).collect()
    }

    /// All units joined - the fully revealed markup.
    pub fn concat(&self) -> String {
        let len = self.units.iter().map(|u| u.as_str().len()).sum();
        let mut out = String::with_capacity(len);
        for unit in &self.units {
            out.push_str(unit.as_str());
        }
        out
    }
}

impl<'a> From<Vec<RevealUnit<'a>>> for RevealSequence<'a> {
    fn from(units: Vec<RevealUnit<'a>>) -> Self {
        Self { units }
    }
}

impl<'s, 'a> IntoIterator for &'s RevealSequence<'a> {
    type Item = &'s RevealUnit<'a>;
    type IntoIter = std::slice::Iter<'s, RevealUnit<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

/// Parse markup and flatten it into reveal units.
pub fn tokenize(markup: &str, granularity: Granularity) -> Result<RevealSequence<'_>, ParseError> {
    let doc = Document::parse(markup)?;
    let sequence = extract(&doc, granularity);
    debug!(
        bytes = markup.len(),
        units = sequence.len(),
        ?granularity,
        "tokenized markup"
    );
    Ok(sequence)
}

/// Like `tokenize`, for input that still has to be checked as UTF-8.
pub fn tokenize_bytes(input: &[u8], granularity: Granularity) -> Result<RevealSequence<'_>, ParseError> {
    let doc = Document::from_bytes(input)?;
    let sequence = extract(&doc, granularity);
    debug!(bytes = input.len(), units = sequence.len(), ?granularity, "tokenized bytes");
    Ok(sequence)
}

/// Flatten an already-parsed document into reveal units.
pub fn extract<'a>(doc: &Document<'a>, granularity: Granularity) -> RevealSequence<'a> {
    let mut units = Vec::new();
    for node in doc.root().children() {
        walk(node, granularity, false, &mut units);
    }
    RevealSequence { units }
}

fn walk<'a>(node: Node<'_, 'a>, granularity: Granularity, raw: bool, out: &mut Vec<RevealUnit<'a>>) {
    match *node.kind() {
        NodeKind::Element { .. } => {
            let Some(el) = node.as_element() else { return };
            out.push(RevealUnit::OpenTag(open_tag(&el)));
            if el.is_void() {
                return;
            }
            let raw = html::is_raw_text(el.name());
            for child in el.children() {
                walk(child, granularity, raw, out);
            }
            out.push(RevealUnit::CloseTag(format!("</{}>", el.name())));
        }
        NodeKind::Text(text) if !text.is_empty() => match granularity {
            Granularity::Node => out.push(RevealUnit::Text(text)),
            Granularity::Character => split_chars(text, raw, out),
        },
        // Comments, doctypes and empty text reveal nothing
        _ => {}
    }
}

fn split_chars<'a>(text: &'a str, raw: bool, out: &mut Vec<RevealUnit<'a>>) {
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        let len = match c {
            '&' if !raw => html::char_ref_len(rest).unwrap_or(1),
            _ => c.len_utf8(),
        };
        let (unit, tail) = rest.split_at(len);
        out.push(RevealUnit::Char(unit));
        rest = tail;
    }
}

fn open_tag(el: &ElementView<'_, '_>) -> String {
    let mut tag = String::with_capacity(2 + el.name().len());
    tag.push('<');
    tag.push_str(el.name());
    for attr in el.attrs() {
        tag.push(' ');
        tag.push_str(&attr.name);
        tag.push_str("=\"");
        push_attr_value(&mut tag, attr.value.unwrap_or(""));
        tag.push('"');
    }
    tag.push('>');
    tag
}

fn push_attr_value(out: &mut String, value: &str) {
    let mut parts = value.split('"');
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for part in parts {
        out.push_str("&quot;");
        out.push_str(part);
    }
}
