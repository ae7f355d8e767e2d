//! Tree builder: the sink that turns parser callbacks into a [`Document`].

use syntactik_parse::text::value_text;
use syntactik_parse::{CharSource, CommentKind, Interval, NodeToken, Quotes, TreeSink};

use crate::node::{Body, Comment, Document, Literal, Node, NodeId};

/// Builds a [`Document`] from one parse.
#[derive(Default)]
pub struct TreeBuilder {
    doc: Document,
}

impl TreeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish building and return the document.
    pub fn finish(self) -> Document {
        self.doc
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let chaining = self.doc.node(parent).delimiter.is_reference();
        let body = &mut self.doc.nodes[parent.0 as usize].body;
        match body {
            Body::Empty if chaining => *body = Body::Reference(child),
            Body::Empty => *body = Body::Children(vec![child]),
            Body::Children(children) => children.push(child),
            Body::Reference(target) => {
                // Further appends after chaining demote the reference to a
                // first child so the body stays exactly one form.
                let target = *target;
                *body = Body::Children(vec![target, child]);
            }
            Body::Literal(_) => {
                debug_assert!(false, "literal node cannot take children");
                *body = Body::Children(vec![child]);
            }
        }
    }
}

impl<S: CharSource> TreeSink<S> for TreeBuilder {
    type Node = NodeId;

    fn create_node(&mut self, source: &S, token: &NodeToken) -> NodeId {
        let body = match &token.value {
            Some(value) => Body::Literal(Literal {
                text: value_text(
                    source.slice(&value.span),
                    value.indent,
                    value.quotes,
                    token.delimiter.is_folded() && value.quotes != Quotes::Single,
                ),
                quotes: value.quotes,
                span: value.span,
                missing_quote: value.missing_quote,
            }),
            None => Body::Empty,
        };
        let id = NodeId(self.doc.nodes.len() as u32);
        self.doc.nodes.push(Node {
            name: source.slice(&token.name).to_string(),
            name_quotes: token.name_quotes,
            name_span: token.name,
            delimiter: token.delimiter,
            delimiter_span: token.delimiter_span,
            body,
            parent: None,
            end_span: Interval::EMPTY,
            ended_by_end_of_input: false,
        });
        id
    }

    fn append_child(&mut self, parent: Option<&NodeId>, child: &NodeId) {
        match parent {
            None => self.doc.root.push(*child),
            Some(&parent) => {
                self.doc.nodes[child.0 as usize].parent = Some(parent);
                self.attach(parent, *child);
            }
        }
    }

    fn close_node(&mut self, node: Option<&NodeId>, end: Interval, ended_by_end_of_input: bool) {
        if let Some(&id) = node {
            let node = &mut self.doc.nodes[id.0 as usize];
            node.end_span = end;
            node.ended_by_end_of_input = ended_by_end_of_input;
        }
    }

    fn comment(&mut self, source: &S, kind: CommentKind, span: Interval) -> Option<NodeId> {
        self.doc.comments.push(Comment {
            kind,
            text: source.slice(&span).to_string(),
            span,
        });
        None
    }
}
