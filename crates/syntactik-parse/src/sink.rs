//! The node-construction contract.

use crate::location::Interval;
use crate::source::CharSource;
use crate::token::{CommentKind, NodeToken};

/// Builds tree nodes from scanned tokens.
///
/// The parser knows nothing about the tree it produces: every structural
/// decision is delivered through this trait, so the same parse can feed an
/// XML-flavored tree, a JSON-flavored tree, or a test recorder. The sink
/// receives the character source with every token so it can slice out name
/// and value text itself.
///
/// A sink may reject an operation by panicking; that is the only fatal
/// condition in a parse.
pub trait TreeSink<S: CharSource> {
    /// Handle to a constructed node.
    type Node: Clone;

    /// Materialize a node from a fully scanned token.
    fn create_node(&mut self, source: &S, token: &NodeToken) -> Self::Node;

    /// Attach `child` to `parent`; `None` means the document root.
    ///
    /// A child appended to a node whose delimiter is the chaining delimiter
    /// `:=` becomes that node's value-reference rather than a block child.
    fn append_child(&mut self, parent: Option<&Self::Node>, child: &Self::Node);

    /// A node's span is complete.
    ///
    /// `node` is `None` when a whitespace-agnostic group's `)` is consumed:
    /// the notification then marks the group boundary itself.
    /// `ended_by_end_of_input` distinguishes genuine termination from
    /// truncation at the end of the source.
    fn close_node(&mut self, node: Option<&Self::Node>, end: Interval, ended_by_end_of_input: bool);

    /// Turn a comment span into a node, if the sink keeps comments.
    ///
    /// Returning `Some` makes the parser append the comment to the node
    /// whose block it appeared in. The span covers the comment's inner text,
    /// markers excluded.
    fn comment(&mut self, source: &S, kind: CommentKind, span: Interval) -> Option<Self::Node> {
        let _ = (source, kind, span);
        None
    }
}
