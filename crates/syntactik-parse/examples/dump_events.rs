use std::io::Read;

use syntactik_parse::{
    CharSource, CommentKind, Interval, NodeToken, Parser, TextSource, TreeSink,
};

struct Dump {
    next: u32,
}

impl<'s> TreeSink<TextSource<'s>> for Dump {
    type Node = u32;

    fn create_node(&mut self, source: &TextSource<'s>, token: &NodeToken) -> u32 {
        let id = self.next;
        self.next += 1;
        println!(
            "create #{id} name={:?} delimiter={:?} value={:?}",
            source.slice(&token.name),
            token.delimiter,
            token.value.as_ref().map(|v| source.slice(&v.span)),
        );
        id
    }

    fn append_child(&mut self, parent: Option<&u32>, child: &u32) {
        println!("append #{child} -> {parent:?}");
    }

    fn close_node(&mut self, node: Option<&u32>, end: Interval, ended_by_end_of_input: bool) {
        println!("close {node:?} at {end} eof={ended_by_end_of_input}");
    }

    fn comment(&mut self, source: &TextSource<'s>, kind: CommentKind, span: Interval) -> Option<u32> {
        println!("comment {kind:?} {:?}", source.slice(&span));
        None
    }
}

fn main() {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source).unwrap();

    let mut sink = Dump { next: 0 };
    let mut errors = Vec::new();
    Parser::new(&source).parse(&mut sink, &mut errors);

    println!("\n=== Diagnostics ===");
    for error in &errors {
        println!("{error}");
    }
}
