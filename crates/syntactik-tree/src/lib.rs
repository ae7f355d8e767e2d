#![doc = include_str!("../README.md")]

mod builder;
pub mod diagnostic;
mod node;

pub use builder::TreeBuilder;
pub use node::{Body, Comment, Document, Literal, Node, NodeId};
pub use syntactik_parse::{
    CharLocation, CommentKind, Delimiter, ErrorKind, Interval, ParseError, Quotes,
};

/// Parse a Syntactik document into a tree, collecting diagnostics.
///
/// Parsing always yields a tree; syntax problems come back as
/// [`ParseError`]s alongside it, never instead of it.
pub fn parse(source: &str) -> (Document, Vec<ParseError>) {
    let mut builder = TreeBuilder::new();
    let mut errors = Vec::new();
    syntactik_parse::Parser::new(source).parse(&mut builder, &mut errors);
    (builder.finish(), errors)
}

#[cfg(test)]
mod tests;
