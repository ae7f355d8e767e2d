#![doc = include_str!("../README.md")]

mod location;
pub use location::{CharLocation, Interval};

mod source;
pub use source::{CharSource, TextSource};

mod token;
pub use token::{CommentKind, Delimiter, NodeToken, Quotes, ValueToken};

mod error;
pub use error::{ErrorKind, ErrorListener, Fanout, ParseError};

mod sink;
pub use sink::TreeSink;

pub mod text;

mod parser;
pub use parser::Parser;
