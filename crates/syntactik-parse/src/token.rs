//! Grammar tokens: delimiters, quoting, comments and scanned pair tokens.

use crate::location::Interval;

/// The delimiter between a pair's name and what follows it.
///
/// Variants are named for their token shape. The core assigns them only a
/// structural class (literal-bearing, block-opening, or reference); any
/// further meaning belongs to downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Delimiter {
    /// No delimiter at all: a bare, name-only pair.
    #[default]
    None,
    /// `:`
    Colon,
    /// `::`
    DoubleColon,
    /// `:::`
    TripleColon,
    /// `=`
    Eq,
    /// `==`
    DoubleEq,
    /// `=:`
    EqColon,
    /// `=::`
    EqDoubleColon,
    /// `:=`
    ColonEq,
}

impl Delimiter {
    /// Whether this delimiter is followed by a literal value.
    pub fn takes_literal(self) -> bool {
        matches!(self, Delimiter::Eq | Delimiter::DoubleEq)
    }

    /// Whether this delimiter opens a block of children.
    pub fn opens_block(self) -> bool {
        matches!(
            self,
            Delimiter::Colon
                | Delimiter::DoubleColon
                | Delimiter::TripleColon
                | Delimiter::EqColon
                | Delimiter::EqDoubleColon
        )
    }

    /// Whether this is the chaining delimiter: the next pair becomes this
    /// pair's value rather than a child.
    pub fn is_reference(self) -> bool {
        matches!(self, Delimiter::ColonEq)
    }

    /// Whether a multi-line literal under this delimiter folds line breaks.
    pub fn is_folded(self) -> bool {
        matches!(self, Delimiter::DoubleEq)
    }

    /// The token text.
    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::None => "",
            Delimiter::Colon => ":",
            Delimiter::DoubleColon => "::",
            Delimiter::TripleColon => ":::",
            Delimiter::Eq => "=",
            Delimiter::DoubleEq => "==",
            Delimiter::EqColon => "=:",
            Delimiter::EqDoubleColon => "=::",
            Delimiter::ColonEq => ":=",
        }
    }
}

/// Quoting applied to a name or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quotes {
    /// Bare (open) name or value.
    #[default]
    None,
    /// `'…'`
    Single,
    /// `"…"`
    Double,
}

impl Quotes {
    /// The quote character, if any.
    pub fn char(self) -> Option<char> {
        match self {
            Quotes::None => None,
            Quotes::Single => Some('\''),
            Quotes::Double => Some('"'),
        }
    }
}

/// Comment flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `'''` to the end of the line.
    SingleLine,
    /// `"""…"""`, possibly spanning lines.
    MultiLine,
}

/// A fully scanned `(name, delimiter, value)` tuple, not yet a tree node.
///
/// Spans cover inner content: quotes are excluded from name and value
/// intervals, and the quoting kind is carried alongside instead.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeToken {
    /// Name span. Zero-width for an anonymous pair.
    pub name: Interval,
    /// Quoting of the name.
    pub name_quotes: Quotes,
    /// The delimiter after the name.
    pub delimiter: Delimiter,
    /// Span of the delimiter token; [`Interval::EMPTY`] when there is none.
    pub delimiter_span: Interval,
    /// The literal value, for literal-bearing delimiters.
    pub value: Option<ValueToken>,
}

/// A scanned literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueToken {
    /// Inner content span (quotes excluded). May cover several lines.
    pub span: Interval,
    /// Quoting of the value.
    pub quotes: Quotes,
    /// Set when the value's closing quote was missing where it ended.
    pub missing_quote: bool,
    /// Structural indent, in characters, stripped from each continuation
    /// line when the literal text is reconstructed.
    pub indent: usize,
}
