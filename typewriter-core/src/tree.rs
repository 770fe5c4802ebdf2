//! Document tree built from lexer events.
//!
//! The tree uses an index-based arena pattern for efficient allocation and
//! to enable parent pointers without reference cycles.
//!
//! Building the tree is also where markup is validated: end tags must match
//! the innermost open element, void elements never take children or end
//! tags, and every element must be closed by end of input. The first
//! problem found rejects the whole document.
//!
//! # Example
//!
//! ```
//! use typewriter_core::tree::Document;
//!
//! let doc = Document::parse(r#"<p class="lead">Hello, <em>world</em></p>"#).unwrap();
//! let p = doc.root().children().next().unwrap().as_element().unwrap();
//!
//! assert_eq!(p.name(), "p");
//! assert_eq!(p.attrs().count(), 1);
//! assert_eq!(p.children().count(), 2);
//! ```

use std::borrow::Cow;

use crate::error::{ParseError, ParseErrorCode};
use crate::event::Event;
use crate::html;
use crate::lexer::Lexer;
use crate::span::Span;

// ============================================================================
// Core Types
// ============================================================================

/// Index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Internal node storage.
#[derive(Debug)]
struct NodeData<'a> {
    children: Vec<NodeId>,
    kind: NodeKind<'a>,
}

/// The kind of node in the tree.
#[derive(Debug)]
pub enum NodeKind<'a> {
    /// Root document container.
    Document,

    /// Element node, name lower-cased.
    Element {
        name: Cow<'a, str>,
        attrs: Vec<Attribute<'a>>,
    },

    /// Text content, verbatim from the source.
    Text(&'a str),

    /// Comment: `<!-- ... -->`.
    Comment(&'a str),

    /// Doctype or other `<!...>` declaration.
    Doctype(&'a str),
}

/// An attribute on an element. `value` is None for valueless attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    pub name: Cow<'a, str>,
    pub value: Option<&'a str>,
}

// ============================================================================
// Document
// ============================================================================

/// A parsed markup document as a tree.
#[derive(Debug)]
pub struct Document<'a> {
    nodes: Vec<NodeData<'a>>,
    root: NodeId,
}

impl<'a> Document<'a> {
    /// Parse markup into a document tree, rejecting malformed input.
    pub fn parse(input: &'a str) -> Result<Self, ParseError> {
        let mut builder = TreeBuilder::new();
        let mut first_error: Option<ParseError> = None;

        Lexer::new(input).parse(|event| {
            if first_error.is_none() {
                if let Err(err) = builder.handle_event(event) {
                    first_error = Some(err);
                }
            }
        });

        if let Some(err) = first_error {
            return Err(err);
        }

        builder.finish()
    }

    /// Parse raw bytes, which must be UTF-8.
    pub fn from_bytes(input: &'a [u8]) -> Result<Self, ParseError> {
        match std::str::from_utf8(input) {
            Ok(s) => Self::parse(s),
            Err(e) => {
                let at = e.valid_up_to();
                let end = at + e.error_len().unwrap_or(input.len() - at);
                Err(ParseError::new(ParseErrorCode::InvalidUtf8, Span::new(at, end)))
            }
        }
    }

    /// Get the root node.
    pub fn root(&self) -> Node<'_, 'a> {
        Node { doc: self, id: self.root }
    }

    /// Total number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document has no content (only the root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn node_data(&self, id: NodeId) -> &NodeData<'a> {
        &self.nodes[id.index()]
    }
}

// ============================================================================
// Node (navigation handle)
// ============================================================================

/// A handle for navigating the document tree.
///
/// This is a lightweight reference that borrows from the document.
/// The `'a: 'doc` bound ensures the source outlives the document borrow.
#[derive(Clone, Copy)]
pub struct Node<'doc, 'a: 'doc> {
    doc: &'doc Document<'a>,
    id: NodeId,
}

impl<'doc, 'a: 'doc> Node<'doc, 'a> {
    /// Get the node's kind.
    pub fn kind(&self) -> &'doc NodeKind<'a> {
        &self.doc.node_data(self.id).kind
    }

    /// Iterate over child nodes.
    pub fn children(&self) -> impl Iterator<Item = Node<'doc, 'a>> + 'doc {
        let doc = self.doc;
        doc.node_data(self.id).children.iter().map(move |&id| Node { doc, id })
    }

    /// Get element view if this is an element.
    pub fn as_element(&self) -> Option<ElementView<'doc, 'a>> {
        if let NodeKind::Element { .. } = self.kind() {
            Some(ElementView { node: *self })
        } else {
            None
        }
    }
}

impl<'doc, 'a> std::fmt::Debug for Node<'doc, 'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}

// ============================================================================
// ElementView (typed access to elements)
// ============================================================================

/// A typed view for element nodes.
#[derive(Clone, Copy)]
pub struct ElementView<'doc, 'a: 'doc> {
    node: Node<'doc, 'a>,
}

impl<'doc, 'a: 'doc> ElementView<'doc, 'a> {
    /// Get the element name.
    pub fn name(&self) -> &'doc str {
        if let NodeKind::Element { name, .. } = self.node.kind() {
            name.as_ref()
        } else {
            unreachable!()
        }
    }

    /// Void elements (`<br>`, `<img>`, ...) have no children and no end tag.
    pub fn is_void(&self) -> bool {
        html::is_void(self.name())
    }

    /// Iterate over all attributes in source order.
    pub fn attrs(&self) -> impl Iterator<Item = &'doc Attribute<'a>> + 'doc {
        let attrs = if let NodeKind::Element { attrs, .. } = self.node.kind() {
            attrs.as_slice()
        } else {
            &[]
        };
        attrs.iter()
    }

    /// Iterate over child nodes.
    pub fn children(&self) -> impl Iterator<Item = Node<'doc, 'a>> + 'doc {
        self.node.children()
    }
}

impl<'doc, 'a> std::fmt::Debug for ElementView<'doc, 'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementView")
            .field("name", &self.name())
            .field("attrs", &self.attrs().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// TreeBuilder (event consumer)
// ============================================================================

/// Builds a document tree from lexer events.
struct TreeBuilder<'a> {
    nodes: Vec<NodeData<'a>>,
    /// Stack of open elements with their start tag spans. Root at the bottom.
    stack: Vec<(NodeId, Span)>,
    /// Element whose start tag is still being read (attributes pending).
    open_tag: Option<(NodeId, Span)>,
}

impl<'a> TreeBuilder<'a> {
    fn new() -> Self {
        // Create root document node
        let root = NodeData {
            children: Vec::new(),
            kind: NodeKind::Document,
        };
        TreeBuilder {
            nodes: vec![root],
            stack: vec![(NodeId::new(0), Span::default())],
            open_tag: None,
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().map_or(NodeId::new(0), |&(id, _)| id)
    }

    fn push_node(&mut self, kind: NodeKind<'a>) -> NodeId {
        let parent = self.current();
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    fn element_name(&self, id: NodeId) -> &str {
        match &self.nodes[id.index()].kind {
            NodeKind::Element { name, .. } => name.as_ref(),
            _ => "",
        }
    }

    fn handle_event(&mut self, event: Event<'a>) -> Result<(), ParseError> {
        use Event::*;

        match event {
            // ---- Elements ----
            ElementStart { name, span } => {
                let id = self.push_node(NodeKind::Element {
                    name,
                    attrs: Vec::new(),
                });
                self.open_tag = Some((id, span));
            }
            Attribute { name, value, .. } => {
                if let Some((id, _)) = self.open_tag {
                    if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.index()].kind {
                        // Later duplicates are ignored
                        if !attrs.iter().any(|a| a.name == name) {
                            attrs.push(self::Attribute { name, value });
                        }
                    }
                }
            }
            StartTagEnd { self_closing, span } => {
                if let Some((id, start)) = self.open_tag.take() {
                    // Void elements close themselves; `<x/>` closes any element
                    if !self_closing && !html::is_void(self.element_name(id)) {
                        self.stack.push((id, start.join(span)));
                    }
                }
            }
            ElementEnd { name, span } => {
                if html::is_void(&name) {
                    return Err(ParseError::new(ParseErrorCode::VoidEndTag, span));
                }
                if self.stack.len() == 1 {
                    return Err(ParseError::new(ParseErrorCode::UnexpectedEndTag, span));
                }
                let (id, _) = self.stack[self.stack.len() - 1];
                if self.element_name(id) != name {
                    return Err(ParseError::new(ParseErrorCode::MismatchedEndTag, span));
                }
                self.stack.pop();
            }

            // ---- Content ----
            Text { content, .. } => {
                self.push_node(NodeKind::Text(content));
            }
            Comment { content, .. } => {
                self.push_node(NodeKind::Comment(content));
            }
            Doctype { content, .. } => {
                self.push_node(NodeKind::Doctype(content));
            }

            // ---- Errors ----
            Error { code, span } => return Err(ParseError::new(code, span)),
        }
        Ok(())
    }

    fn finish(self) -> Result<Document<'a>, ParseError> {
        if let Some((_, span)) = self.open_tag {
            return Err(ParseError::new(ParseErrorCode::UnclosedTag, span));
        }
        if self.stack.len() > 1 {
            let (_, span) = self.stack[self.stack.len() - 1];
            return Err(ParseError::new(ParseErrorCode::UnclosedElement, span));
        }
        Ok(Document {
            nodes: self.nodes,
            root: NodeId::new(0),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
