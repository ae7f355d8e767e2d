use crate::{Body, CommentKind, Delimiter, Quotes, parse};

#[test]
fn test_empty_document() {
    let (doc, errors) = parse("");
    assert!(doc.is_empty());
    assert!(doc.root().is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_simple_pairs() {
    let (doc, errors) = parse("name = Alice\nage = 30");
    assert!(errors.is_empty());
    assert_eq!(doc.get("name").and_then(|n| n.value_text()), Some("Alice"));
    assert_eq!(doc.get("age").and_then(|n| n.value_text()), Some("30"));
}

#[test]
fn test_block_structure() {
    let (doc, errors) = parse("server:\n    host = localhost\n    port = 8080");
    assert!(errors.is_empty());
    let server = doc.root()[0];
    assert_eq!(doc.node(server).name, "server");
    assert_eq!(doc.node(server).delimiter, Delimiter::Colon);
    let children = doc.children(server);
    assert_eq!(children.len(), 2);
    for &child in children {
        assert_eq!(doc.node(child).parent, Some(server));
    }
    assert_eq!(doc.node(children[0]).value_text(), Some("localhost"));
}

#[test]
fn test_quoted_name_is_unquoted_text() {
    let (doc, errors) = parse("'first name' = Ada");
    assert!(errors.is_empty());
    let node = doc.get("first name").expect("quoted name");
    assert_eq!(node.name_quotes, Quotes::Single);
}

#[test]
fn test_chaining_builds_a_reference() {
    let (doc, errors) = parse("a := b = 5");
    assert!(errors.is_empty());
    let a = doc.root()[0];
    let Body::Reference(b) = &doc.node(a).body else {
        panic!("expected reference body, got {:?}", doc.node(a).body);
    };
    assert_eq!(doc.node(*b).name, "b");
    assert_eq!(doc.node(*b).value_text(), Some("5"));
    assert_eq!(doc.node(*b).parent, Some(a));
}

#[test]
fn test_append_after_reference_demotes_to_children() {
    let (doc, _) = parse("a := b = 1\n    c = 2");
    let a = doc.root()[0];
    let Body::Children(children) = &doc.node(a).body else {
        panic!("expected children body, got {:?}", doc.node(a).body);
    };
    assert_eq!(children.len(), 2);
    assert_eq!(doc.node(children[0]).name, "b");
    assert_eq!(doc.node(children[1]).name, "c");
}

#[test]
fn test_comments_are_kept() {
    let (doc, errors) = parse("''' greeting\nhello = world");
    assert!(errors.is_empty());
    assert_eq!(doc.comments().len(), 1);
    assert_eq!(doc.comments()[0].kind, CommentKind::SingleLine);
    assert_eq!(doc.comments()[0].text, " greeting");
}

#[test]
fn test_missing_quote_is_flagged() {
    let (doc, errors) = parse("a = \"oops");
    assert_eq!(errors.len(), 1);
    let a = doc.get("a").unwrap();
    let literal = a.literal().unwrap();
    assert_eq!(literal.text, "oops");
    assert!(literal.missing_quote);
    assert!(a.ended_by_end_of_input);
}

#[test]
fn test_anonymous_array_items() {
    let (doc, errors) = parse("list:(= 1, = 2)");
    assert!(errors.is_empty(), "unexpected {errors:?}");
    let list = doc.root()[0];
    let items = doc.children(list);
    assert_eq!(items.len(), 2);
    for &item in items {
        assert!(doc.node(item).name.is_empty());
    }
    assert_eq!(doc.node(items[1]).value_text(), Some("2"));
}

#[test]
fn test_malformed_input_still_yields_a_tree() {
    let (doc, errors) = parse("a:\n   b = 1\n  c = )\n((");
    assert!(!errors.is_empty());
    assert!(!doc.is_empty());
    assert!(doc.get("a").is_some());
}

#[test]
fn test_outline() {
    let source = "server:\n    host = localhost\n    ports:(= 8080, = 8081)\n    motd ==\n        hi there";
    let (doc, errors) = parse(source);
    assert!(errors.is_empty(), "unexpected {errors:?}");
    insta::assert_snapshot!(doc.outline(), @r#"
    server :
      host = "localhost"
      ports :
        = "8080"
        = "8081"
      motd == "hi there"
    "#);
}

#[test]
fn test_outline_reference() {
    let (doc, errors) = parse("a := b = 5");
    assert!(errors.is_empty());
    insta::assert_snapshot!(doc.outline(), @r#"
    a :=
      b = "5"
    "#);
}
