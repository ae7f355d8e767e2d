//! The arena-backed generic tree.

use std::fmt::Write as _;

use syntactik_parse::{CommentKind, Delimiter, Interval, Quotes};

/// Index of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// A parsed Syntactik document.
///
/// Nodes live in an arena and refer to each other by index. The document
/// itself stands in for the implicit module root; top-level nodes are
/// [`Document::root`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: Vec<NodeId>,
    pub(crate) comments: Vec<Comment>,
}

/// A generic `(name, delimiter, value-or-children)` node.
///
/// The name is raw source text: sigils like `@` or `!$` are not interpreted
/// here.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Name text, quotes excluded. Empty for anonymous nodes.
    pub name: String,
    /// Quoting of the name.
    pub name_quotes: Quotes,
    /// Source span of the name.
    pub name_span: Interval,
    /// The delimiter after the name.
    pub delimiter: Delimiter,
    /// Source span of the delimiter.
    pub delimiter_span: Interval,
    /// What the node carries.
    pub body: Body,
    /// The node's parent; `None` for top-level nodes.
    pub parent: Option<NodeId>,
    /// Where the node's span closed.
    pub end_span: Interval,
    /// Whether the node was closed by running out of input.
    pub ended_by_end_of_input: bool,
}

/// What a node carries. The filled forms are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Nothing: a bare name, or a block that never got children.
    Empty,
    /// A literal value.
    Literal(Literal),
    /// Another node standing in as the value (`:=` chaining).
    Reference(NodeId),
    /// A block of children.
    Children(Vec<NodeId>),
}

/// A literal value with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The reconstructed text.
    pub text: String,
    /// Quoting of the value.
    pub quotes: Quotes,
    /// Source span of the value's inner content.
    pub span: Interval,
    /// Whether the closing quote was missing where the value ended.
    pub missing_quote: bool,
}

/// A comment captured alongside the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment flavor.
    pub kind: CommentKind,
    /// Inner text, markers excluded.
    pub text: String,
    /// Source span of the inner text.
    pub span: Interval,
}

impl Document {
    /// Look up a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// Top-level nodes.
    pub fn root(&self) -> &[NodeId] {
        &self.root
    }

    /// Children of a node; empty unless its body is a block.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).body {
            Body::Children(children) => children,
            _ => &[],
        }
    }

    /// First top-level node with the given name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.root
            .iter()
            .map(|&id| self.node(id))
            .find(|node| node.name == name)
    }

    /// Comments, in source order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// An indented plain-text dump of the tree, one node per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for &id in &self.root {
            self.outline_node(&mut out, id, 0);
        }
        out
    }

    fn outline_node(&self, out: &mut String, id: NodeId, depth: usize) {
        let node = self.node(id);
        for _ in 0..depth {
            out.push_str("  ");
        }
        let mut parts: Vec<String> = Vec::new();
        if !node.name.is_empty() {
            parts.push(node.name.clone());
        }
        if node.delimiter != Delimiter::None {
            parts.push(node.delimiter.as_str().to_string());
        }
        if let Body::Literal(literal) = &node.body {
            parts.push(format!("{:?}", literal.text));
        }
        let _ = writeln!(out, "{}", parts.join(" "));
        match &node.body {
            Body::Reference(target) => self.outline_node(out, *target, depth + 1),
            Body::Children(children) => {
                for &child in children {
                    self.outline_node(out, child, depth + 1);
                }
            }
            _ => {}
        }
    }
}

impl Node {
    /// The literal value, if the body is one.
    pub fn literal(&self) -> Option<&Literal> {
        match &self.body {
            Body::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// The literal value's text, if the body is one.
    pub fn value_text(&self) -> Option<&str> {
        self.literal().map(|literal| literal.text.as_str())
    }
}
