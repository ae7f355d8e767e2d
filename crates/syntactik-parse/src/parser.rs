//! Single-pass, scannerless parser for the Syntactik notation.
//!
//! Lexing and parsing are fused into one stateful walk over the character
//! source. The parser always runs to completion: every diagnostic is
//! recoverable and goes out through the [`ErrorListener`] channel while
//! structure keeps flowing into the [`TreeSink`]. Malformed input yields the
//! most plausible tree, never an abort.

use tracing::trace;

use crate::error::{ErrorKind, ErrorListener, ParseError};
use crate::location::{CharLocation, Interval};
use crate::sink::TreeSink;
use crate::source::{CharSource, TextSource};
use crate::token::{CommentKind, Delimiter, NodeToken, Quotes, ValueToken};

/// The parser. One instance drives exactly one parse.
pub struct Parser<S: CharSource> {
    source: S,
}

impl<'src> Parser<TextSource<'src>> {
    /// Create a parser over a text buffer.
    pub fn new(text: &'src str) -> Self {
        Self {
            source: TextSource::new(text),
        }
    }
}

impl<S: CharSource> Parser<S> {
    /// Create a parser over any character source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Run the parse to completion, feeding `sink` and `errors`.
    pub fn parse<T, E>(self, sink: &mut T, errors: &mut E)
    where
        T: TreeSink<S>,
        E: ErrorListener,
    {
        let mut run = Run {
            source: self.source,
            sink,
            errors,
            stack: vec![Frame {
                node: None,
                indent: -1,
                block_indent: -1,
            }],
            wsa: Vec::new(),
            state: State::Indent,
            indent: 0,
            chaining: false,
            inline: false,
            pending: None,
            mls: None,
            indent_char: None,
            multiplicity: 0,
        };
        run.run();
    }
}

/// Sub-states of the line parsing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Indent,
    PairDelimiter,
    Name,
    Delimiter,
    Value,
    IndentMls,
}

/// An open node awaiting its closing trigger.
struct Frame<N> {
    /// `None` only for the synthetic root frame.
    node: Option<N>,
    /// Indent of the line where the node's name appeared; -1 for the root.
    indent: i32,
    /// Indent shared by the node's children; -1 until the first child.
    block_indent: i32,
}

/// An open whitespace-agnostic group.
struct WsaFrame {
    /// Open-node stack depth when `(` was consumed; `)` unwinds back to it.
    depth: usize,
    /// Indent of the line that opened the group.
    indent: i32,
    /// Span of the `(` itself.
    open: Interval,
}

/// A recognized (name, delimiter) pair not yet materialized as a node.
struct Pending {
    name: Interval,
    name_quotes: Quotes,
    delimiter: Delimiter,
    delimiter_span: Interval,
}

/// A literal value that is still being scanned across lines.
struct MlsValue {
    /// The quote character, for quoted values.
    quote: Option<char>,
    begin: CharLocation,
    /// Exclusive end of the content scanned so far.
    end: CharLocation,
    /// Structural indent budget; resolved at the first continuation line.
    indent: Option<usize>,
}

/// Punctuation that cannot appear inside an open name.
fn is_reserved(c: char) -> bool {
    matches!(c, '(' | ')' | ',' | '\'' | '"')
}

fn quote_token(q: char) -> &'static str {
    if q == '\'' { "'" } else { "\"" }
}

struct Run<'a, S: CharSource, T: TreeSink<S>, E: ErrorListener> {
    source: S,
    sink: &'a mut T,
    errors: &'a mut E,
    /// Open-node stack; the bottom frame is the synthetic root.
    stack: Vec<Frame<T::Node>>,
    /// Open whitespace-agnostic groups.
    wsa: Vec<WsaFrame>,
    state: State,
    /// Indent of the current structural line.
    indent: i32,
    /// Set after `:=`: the next pair becomes the previous pair's value.
    chaining: bool,
    /// Set once the line contains grouping punctuation; an inline line's
    /// values never continue onto following lines.
    inline: bool,
    pending: Option<Pending>,
    mls: Option<MlsValue>,
    /// The module's indent character, fixed by the first indent run.
    indent_char: Option<char>,
    /// The module's indent unit; 0 until the first non-zero indent.
    multiplicity: usize,
}

impl<S: CharSource, T: TreeSink<S>, E: ErrorListener> Run<'_, S, T, E> {
    fn run(&mut self) {
        while !self.source.at_end() {
            match self.state {
                State::Indent => self.parse_indent(),
                State::PairDelimiter => self.parse_pair_delimiter(),
                State::Name => self.parse_name(),
                State::Delimiter => self.parse_delimiter(),
                State::Value => self.parse_value(),
                State::IndentMls => self.parse_mls_line(),
            }
        }
        self.finish();
    }

    /// Wind down at end of input: close the multi-line value, the pending
    /// pair and every open frame, then report an unclosed group.
    fn finish(&mut self) {
        let eof = self.source.location();
        if let Some(mls) = self.mls.take() {
            let missing = mls.quote.is_some();
            if let Some(q) = mls.quote {
                self.report(ErrorKind::Expected(quote_token(q)), Interval::at(eof));
            }
            let end = if mls.quote.is_some() { eof } else { mls.end };
            self.end_mls(mls, end, Interval::at(end), missing, true);
        } else if let Some(pending) = self.pending.take() {
            let value = pending.delimiter.takes_literal().then(|| ValueToken {
                span: Interval::at(eof),
                quotes: Quotes::None,
                missing_quote: false,
                indent: 0,
            });
            self.commit_pending(pending, value, Interval::at(eof), true);
        }
        while self.stack.len() > 1 {
            let frame = self.stack.pop().unwrap();
            if let Some(node) = frame.node {
                self.sink.close_node(Some(&node), Interval::at(eof), true);
            }
        }
        if let Some(group) = self.wsa.last() {
            self.report(ErrorKind::Expected(")"), group.open);
        }
    }

    fn report(&mut self, kind: ErrorKind, span: Interval) {
        let error = ParseError::new(kind, span);
        trace!(%error, "diagnostic");
        self.errors.on_error(&error);
    }

    fn top_node(&self) -> Option<T::Node> {
        self.stack.last().and_then(|frame| frame.node.clone())
    }

    /// Multi-line continuation is only possible outside groups and off
    /// inline lines.
    fn mls_allowed(&self) -> bool {
        self.wsa.is_empty() && !self.inline
    }

    /// Materialize and close a pair in one step.
    fn commit_pending(
        &mut self,
        pending: Pending,
        value: Option<ValueToken>,
        end: Interval,
        ended_by_eof: bool,
    ) {
        self.chaining = false;
        let token = NodeToken {
            name: pending.name,
            name_quotes: pending.name_quotes,
            delimiter: pending.delimiter,
            delimiter_span: pending.delimiter_span,
            value,
        };
        trace!(delimiter = token.delimiter.as_str(), "pair complete");
        let node = self.sink.create_node(&self.source, &token);
        let parent = self.top_node();
        self.sink.append_child(parent.as_ref(), &node);
        self.sink.close_node(Some(&node), end, ended_by_eof);
    }

    /// Materialize a block-opening pair and push it as an open frame.
    fn open_block(&mut self, pending: Pending) {
        self.chaining = false;
        let token = NodeToken {
            name: pending.name,
            name_quotes: pending.name_quotes,
            delimiter: pending.delimiter,
            delimiter_span: pending.delimiter_span,
            value: None,
        };
        trace!(delimiter = token.delimiter.as_str(), "block open");
        let node = self.sink.create_node(&self.source, &token);
        let parent = self.top_node();
        self.sink.append_child(parent.as_ref(), &node);
        self.stack.push(Frame {
            node: Some(node),
            indent: self.indent,
            block_indent: -1,
        });
    }

    /// Close every frame above `depth` (the root frame never closes).
    fn unwind_to(&mut self, depth: usize, span: Interval) {
        let depth = depth.max(1);
        while self.stack.len() > depth {
            let frame = self.stack.pop().unwrap();
            if let Some(node) = frame.node {
                self.sink.close_node(Some(&node), span, false);
            }
        }
    }

    /// Consume a maximal run of one indent character class, reporting mixing.
    fn consume_indent_run(&mut self) -> (usize, Option<char>) {
        let begin = self.source.location();
        let mut width = 0;
        let mut first: Option<char> = None;
        let mut mixed = false;
        while let Some(c @ (' ' | '\t')) = self.source.next_char() {
            if let Some(reference) = self.indent_char.or(first)
                && c != reference
            {
                mixed = true;
            }
            if first.is_none() {
                first = Some(c);
            }
            self.source.consume();
            width += 1;
        }
        if mixed {
            self.report(
                ErrorKind::MixedIndentation,
                Interval::new(begin, self.source.location()),
            );
        }
        (width, first)
    }

    /// Skip blank and comment-only lines, then validate the first
    /// significant line's indent and decide which open nodes close.
    fn parse_indent(&mut self) {
        debug_assert!(self.wsa.is_empty());
        loop {
            let begin = self.source.location();
            let (width, first) = self.consume_indent_run();
            match self.source.next_char() {
                None => return,
                Some('\n' | '\r') => {
                    self.source.consume_newline();
                }
                Some('\'' | '"') if self.comment_ahead().is_some() => {
                    let kind = self.comment_ahead().unwrap();
                    self.consume_comment(kind);
                    if self.source.consume_newline() {
                        continue;
                    }
                    if self.source.at_end() {
                        return;
                    }
                    // Code follows a comment on the same line.
                    self.apply_indent(width, first, begin);
                    return;
                }
                Some(_) => {
                    self.apply_indent(width, first, begin);
                    return;
                }
            }
        }
    }

    /// Validate a structural line's indent and pop frames it closes.
    ///
    /// Also the re-entry point for a line that ended a multi-line value:
    /// its indent was already consumed, so it is passed in.
    fn apply_indent(&mut self, width: usize, first: Option<char>, begin: CharLocation) {
        self.inline = false;
        self.chaining = false;
        let span = Interval::new(begin, self.source.location());
        if self.multiplicity == 0 && width > 0 {
            self.multiplicity = width;
            self.indent_char = first;
            trace!(multiplicity = width, "indent unit fixed");
        }
        let w = width as i32;
        if self.multiplicity > 0 {
            if width % self.multiplicity != 0 {
                self.report(ErrorKind::InvalidIndentMultiplicity, span);
            }
            if w > self.indent && (w - self.indent) as usize > self.multiplicity {
                self.report(ErrorKind::InvalidIndentationSize, span);
            }
        }
        let close_at = Interval::at(self.source.location());
        while self.stack.len() > 1 && self.stack.last().unwrap().indent >= w {
            let frame = self.stack.pop().unwrap();
            if let Some(node) = frame.node {
                self.sink.close_node(Some(&node), close_at, false);
            }
        }
        let mismatch = {
            let top = self.stack.last_mut().unwrap();
            if top.block_indent < 0 {
                top.block_indent = w;
                false
            } else if top.block_indent != w {
                top.block_indent = w;
                true
            } else {
                false
            }
        };
        if mismatch {
            self.report(ErrorKind::BlockIndentMismatch, span);
        }
        self.indent = w;
        self.state = State::PairDelimiter;
    }

    /// Consume separators and groupers between pairs.
    fn parse_pair_delimiter(&mut self) {
        loop {
            self.source.consume_spaces();
            let Some(c) = self.source.next_char() else {
                return;
            };
            match c {
                '\n' | '\r' => {
                    self.source.consume_newline();
                    if self.wsa.is_empty() {
                        self.state = State::Indent;
                        return;
                    }
                    // Newlines inside a group are insensitive; the next
                    // line's leading run is still checked.
                    self.wsa_line_start();
                }
                '\'' | '"' => {
                    if let Some(kind) = self.comment_ahead() {
                        self.consume_comment(kind);
                    } else {
                        self.state = State::Name;
                        return;
                    }
                }
                '(' => {
                    let begin = self.source.location();
                    self.source.consume();
                    let open = Interval::new(begin, self.source.location());
                    self.wsa.push(WsaFrame {
                        depth: self.stack.len(),
                        indent: self.indent,
                        open,
                    });
                    self.inline = true;
                }
                ')' => {
                    let begin = self.source.location();
                    self.source.consume();
                    let span = Interval::new(begin, self.source.location());
                    match self.wsa.pop() {
                        Some(group) => {
                            self.unwind_to(group.depth, span);
                            // The group boundary itself.
                            self.sink.close_node(None, span, false);
                        }
                        None => self.report(ErrorKind::UnexpectedCharacters(")".into()), span),
                    }
                    self.inline = true;
                }
                ',' => {
                    let begin = self.source.location();
                    self.source.consume();
                    let span = Interval::new(begin, self.source.location());
                    match self.wsa.last() {
                        Some(group) => {
                            let depth = group.depth;
                            self.unwind_to(depth, span);
                        }
                        None => self.report(ErrorKind::UnexpectedCharacters(",".into()), span),
                    }
                    self.inline = true;
                }
                _ => {
                    self.state = State::Name;
                    return;
                }
            }
        }
    }

    /// Leading-run check for a fresh line inside a WSA group.
    fn wsa_line_start(&mut self) {
        let begin = self.source.location();
        let (width, _) = self.consume_indent_run();
        // A blank line carries no structure to check.
        if matches!(self.source.next_char(), None | Some('\n' | '\r')) {
            return;
        }
        if let Some(group) = self.wsa.last()
            && (width as i32) < group.indent
        {
            self.report(
                ErrorKind::InvalidIndentation,
                Interval::new(begin, self.source.location()),
            );
        }
    }

    fn comment_ahead(&self) -> Option<CommentKind> {
        match self.source.next_char() {
            Some('\'') if self.source.la(2) == Some('\'') && self.source.la(3) == Some('\'') => {
                Some(CommentKind::SingleLine)
            }
            Some('"') if self.source.la(2) == Some('"') && self.source.la(3) == Some('"') => {
                Some(CommentKind::MultiLine)
            }
            _ => None,
        }
    }

    fn consume_comment(&mut self, kind: CommentKind) {
        for _ in 0..3 {
            self.source.consume();
        }
        let begin = self.source.location();
        let end = match kind {
            CommentKind::SingleLine => {
                while !matches!(self.source.next_char(), None | Some('\n' | '\r')) {
                    self.source.consume();
                }
                self.source.location()
            }
            CommentKind::MultiLine => loop {
                match self.source.next_char() {
                    None => {
                        let loc = self.source.location();
                        self.report(ErrorKind::Expected("\"\"\""), Interval::at(loc));
                        break loc;
                    }
                    Some('"')
                        if self.source.la(2) == Some('"') && self.source.la(3) == Some('"') =>
                    {
                        let loc = self.source.location();
                        for _ in 0..3 {
                            self.source.consume();
                        }
                        break loc;
                    }
                    Some(_) => {
                        self.source.consume();
                    }
                }
            },
        };
        let span = Interval::new(begin, end);
        if let Some(node) = self.sink.comment(&self.source, kind, span) {
            let parent = self.top_node();
            self.sink.append_child(parent.as_ref(), &node);
        }
    }

    /// Dispatch on the first character of a name.
    fn parse_name(&mut self) {
        match self.source.next_char() {
            Some('\'') => self.parse_quoted_name('\''),
            Some('"') => self.parse_quoted_name('"'),
            Some(':' | '=') => {
                // Anonymous pair: the delimiter follows immediately.
                let loc = self.source.location();
                self.pending = Some(Pending {
                    name: Interval::at(loc),
                    name_quotes: Quotes::None,
                    delimiter: Delimiter::None,
                    delimiter_span: Interval::EMPTY,
                });
                self.state = State::Delimiter;
            }
            _ => self.parse_open_name(),
        }
    }

    fn parse_quoted_name(&mut self, q: char) {
        let quotes = if q == '\'' { Quotes::Single } else { Quotes::Double };
        self.source.consume();
        let begin = self.source.location();
        let (name, complete) = loop {
            match self.source.next_char() {
                None | Some('\n' | '\r') => {
                    break (Interval::new(begin, self.source.location()), false);
                }
                Some(c) if c == q => {
                    let end = self.source.location();
                    self.source.consume();
                    break (Interval::new(begin, end), true);
                }
                Some(_) => {
                    self.source.consume();
                }
            }
        };
        if !complete {
            self.report(
                ErrorKind::Expected(quote_token(q)),
                Interval::at(self.source.location()),
            );
        }
        self.pending = Some(Pending {
            name,
            name_quotes: quotes,
            delimiter: Delimiter::None,
            delimiter_span: Interval::EMPTY,
        });
        self.state = State::Delimiter;
    }

    /// Scan an open name up to a delimiter, line end, or reserved
    /// punctuation. Trailing whitespace stays outside the name span.
    fn parse_open_name(&mut self) {
        let begin = self.source.location();
        let mut end = begin;
        loop {
            match self.source.next_char() {
                None | Some('\n' | '\r' | ':' | '=') => break,
                Some(',' | ')') if !self.wsa.is_empty() => break,
                Some(c) if is_reserved(c) => {
                    let run_begin = self.source.location();
                    let mut found = String::new();
                    while let Some(r) = self.source.next_char() {
                        if !is_reserved(r) || (!self.wsa.is_empty() && matches!(r, ',' | ')')) {
                            break;
                        }
                        found.push(r);
                        self.source.consume();
                    }
                    self.report(
                        ErrorKind::UnexpectedCharacters(found),
                        Interval::new(run_begin, self.source.location()),
                    );
                    break;
                }
                Some(c) => {
                    self.source.consume();
                    if !c.is_whitespace() {
                        end = self.source.location();
                    }
                }
            }
        }
        self.pending = Some(Pending {
            name: Interval::new(begin, end),
            name_quotes: Quotes::None,
            delimiter: Delimiter::None,
            delimiter_span: Interval::EMPTY,
        });
        self.state = State::Delimiter;
    }

    /// Longest-match delimiter recognition and dispatch.
    fn parse_delimiter(&mut self) {
        self.source.consume_spaces();
        match self.source.next_char() {
            Some(':' | '=') => {
                let begin = self.source.location();
                let delimiter = self.scan_delimiter();
                let span = Interval::new(begin, self.source.location());
                // Stray delimiter characters right after a recognized token.
                if matches!(self.source.next_char(), Some(':' | '=')) {
                    let run_begin = self.source.location();
                    let mut found = String::new();
                    while let Some(c @ (':' | '=')) = self.source.next_char() {
                        found.push(c);
                        self.source.consume();
                    }
                    self.report(
                        ErrorKind::UnexpectedCharacters(found),
                        Interval::new(run_begin, self.source.location()),
                    );
                }
                let mut pending = self.pending.take().expect("pending pair at delimiter");
                pending.delimiter = delimiter;
                pending.delimiter_span = span;
                if delimiter.takes_literal() {
                    self.pending = Some(pending);
                    self.state = State::Value;
                } else {
                    let reference = delimiter.is_reference();
                    self.open_block(pending);
                    if reference {
                        self.chaining = true;
                        self.inline = true;
                    }
                    self.state = State::PairDelimiter;
                }
            }
            _ => {
                // No delimiter: a name-only pair.
                let pending = self.pending.take().expect("pending pair at delimiter");
                let end = Interval::at(pending.name.end);
                let eof = self.source.at_end();
                self.commit_pending(pending, None, end, eof);
                self.state = State::PairDelimiter;
            }
        }
    }

    fn scan_delimiter(&mut self) -> Delimiter {
        match self.source.consume() {
            Some(':') => match self.source.next_char() {
                Some('=') => {
                    self.source.consume();
                    Delimiter::ColonEq
                }
                Some(':') => {
                    self.source.consume();
                    if self.source.next_char() == Some(':') {
                        self.source.consume();
                        Delimiter::TripleColon
                    } else {
                        Delimiter::DoubleColon
                    }
                }
                _ => Delimiter::Colon,
            },
            _ => match self.source.next_char() {
                Some('=') => {
                    self.source.consume();
                    Delimiter::DoubleEq
                }
                Some(':') => {
                    self.source.consume();
                    if self.source.next_char() == Some(':') {
                        self.source.consume();
                        Delimiter::EqDoubleColon
                    } else {
                        Delimiter::EqColon
                    }
                }
                _ => Delimiter::Eq,
            },
        }
    }

    /// Scan a literal value after `=` or `==`.
    fn parse_value(&mut self) {
        self.source.consume_spaces();
        match self.source.next_char() {
            Some('\'') => self.parse_quoted_value('\''),
            Some('"') => self.parse_quoted_value('"'),
            None | Some('\n' | '\r') => self.empty_value(),
            _ => self.parse_open_value(),
        }
    }

    /// Nothing (or only whitespace) followed the delimiter on this line.
    fn empty_value(&mut self) {
        let loc = self.source.location();
        if !self.source.at_end() && self.mls_allowed() {
            // Provisionally multi-line; continuation lines decide.
            self.mls = Some(MlsValue {
                quote: None,
                begin: loc,
                end: loc,
                indent: None,
            });
            self.state = State::IndentMls;
            return;
        }
        let eof = self.source.at_end();
        let pending = self.pending.take().expect("pending pair at value");
        let value = ValueToken {
            span: Interval::at(loc),
            quotes: Quotes::None,
            missing_quote: false,
            indent: 0,
        };
        self.commit_pending(pending, Some(value), Interval::at(loc), eof);
        self.state = State::PairDelimiter;
    }

    /// Scan a bare value to the end of the line (or a group separator),
    /// trimming trailing whitespace out of the span.
    fn parse_open_value(&mut self) {
        let begin = self.source.location();
        let mut end = begin;
        loop {
            match self.source.next_char() {
                None | Some('\n' | '\r') => break,
                Some(')' | ',') if !self.wsa.is_empty() => break,
                Some(c) => {
                    self.source.consume();
                    if !c.is_whitespace() {
                        end = self.source.location();
                    }
                }
            }
        }
        if end.index == begin.index {
            self.empty_value();
            return;
        }
        let pending = self.pending.take().expect("pending pair at value");
        let value = ValueToken {
            span: Interval::new(begin, end),
            quotes: Quotes::None,
            missing_quote: false,
            indent: 0,
        };
        let eof = self.source.at_end();
        self.commit_pending(pending, Some(value), Interval::at(end), eof);
        self.state = State::PairDelimiter;
    }

    fn parse_quoted_value(&mut self, q: char) {
        let quotes = if q == '\'' { Quotes::Single } else { Quotes::Double };
        self.source.consume();
        let begin = self.source.location();
        let mut prev: Option<char> = None;
        loop {
            match self.source.next_char() {
                None => {
                    let loc = self.source.location();
                    self.report(ErrorKind::Expected(quote_token(q)), Interval::at(loc));
                    let pending = self.pending.take().expect("pending pair at value");
                    let value = ValueToken {
                        span: Interval::new(begin, loc),
                        quotes,
                        missing_quote: true,
                        indent: 0,
                    };
                    self.commit_pending(pending, Some(value), Interval::at(loc), true);
                    self.state = State::PairDelimiter;
                    return;
                }
                Some('\n' | '\r') => {
                    if self.mls_allowed() {
                        self.mls = Some(MlsValue {
                            quote: Some(q),
                            begin,
                            end: self.source.location(),
                            indent: None,
                        });
                        self.state = State::IndentMls;
                        return;
                    }
                    // No continuation possible here; take the value as
                    // scanned and flag the missing quote.
                    let loc = self.source.location();
                    self.report(ErrorKind::Expected(quote_token(q)), Interval::at(loc));
                    let pending = self.pending.take().expect("pending pair at value");
                    let value = ValueToken {
                        span: Interval::new(begin, loc),
                        quotes,
                        missing_quote: true,
                        indent: 0,
                    };
                    self.commit_pending(pending, Some(value), Interval::at(loc), false);
                    self.state = State::PairDelimiter;
                    return;
                }
                Some(c) if c == q && !(q == '"' && prev == Some('\\')) => {
                    let end = self.source.location();
                    self.source.consume();
                    let close = Interval::new(end, self.source.location());
                    let pending = self.pending.take().expect("pending pair at value");
                    let value = ValueToken {
                        span: Interval::new(begin, end),
                        quotes,
                        missing_quote: false,
                        indent: 0,
                    };
                    self.commit_pending(pending, Some(value), close, false);
                    self.state = State::PairDelimiter;
                    return;
                }
                Some(c) => {
                    prev = Some(c);
                    self.source.consume();
                }
            }
        }
    }

    /// One physical line of a multi-line value.
    fn parse_mls_line(&mut self) {
        self.source.consume_newline();
        let begin = self.source.location();
        let (width, first) = self.consume_indent_run();
        if self.source.at_end() {
            return; // finish() closes the value
        }
        if matches!(self.source.next_char(), Some('\n' | '\r')) {
            return; // blank line: value content for now
        }
        if self.multiplicity == 0 && width > 0 {
            self.multiplicity = width;
            self.indent_char = first;
            trace!(multiplicity = width, "indent unit fixed");
        }
        let budget = {
            let mls = self.mls.as_mut().expect("multi-line value state");
            *mls
                .indent
                .get_or_insert(self.indent.max(0) as usize + self.multiplicity)
        };
        if width < budget || width as i32 <= self.indent {
            // The line is structure, not content: the value ends here and
            // the line is reprocessed by the indentation tracker.
            let mls = self.mls.take().expect("multi-line value state");
            let missing = mls.quote.is_some();
            if let Some(q) = mls.quote {
                self.report(ErrorKind::Expected(quote_token(q)), Interval::at(begin));
            }
            let end = mls.end;
            self.end_mls(mls, end, Interval::at(end), missing, false);
            self.apply_indent(width, first, begin);
            return;
        }
        match self.mls.as_ref().expect("multi-line value state").quote {
            None => loop {
                match self.source.next_char() {
                    None | Some('\n' | '\r') => return,
                    Some(c) => {
                        self.source.consume();
                        if !c.is_whitespace() {
                            let loc = self.source.location();
                            self.mls.as_mut().expect("multi-line value state").end = loc;
                        }
                    }
                }
            },
            Some(q) => {
                let mut prev: Option<char> = None;
                loop {
                    match self.source.next_char() {
                        None | Some('\n' | '\r') => return,
                        Some(c) if c == q && !(q == '"' && prev == Some('\\')) => {
                            let end = self.source.location();
                            self.source.consume();
                            let close = Interval::new(end, self.source.location());
                            let mls = self.mls.take().expect("multi-line value state");
                            self.end_mls(mls, end, close, false, false);
                            self.state = State::PairDelimiter;
                            return;
                        }
                        Some(c) => {
                            prev = Some(c);
                            self.source.consume();
                        }
                    }
                }
            }
        }
    }

    /// Commit the pending pair with its finished multi-line value.
    fn end_mls(
        &mut self,
        mls: MlsValue,
        end: CharLocation,
        close: Interval,
        missing_quote: bool,
        ended_by_eof: bool,
    ) {
        let quotes = match mls.quote {
            None => Quotes::None,
            Some('\'') => Quotes::Single,
            Some(_) => Quotes::Double,
        };
        let pending = self.pending.take().expect("pending pair for multi-line value");
        let value = ValueToken {
            span: Interval::new(mls.begin, end),
            quotes,
            missing_quote,
            indent: mls.indent.unwrap_or(0),
        };
        self.commit_pending(pending, Some(value), close, ended_by_eof);
    }
}
