//! Reconstructing literal text from scanned value spans.
//!
//! The parser only records where a value begins and ends; the characters in
//! between are reinterpreted here. Keeping this in one place means every
//! sink reconstructs multi-line values identically: structural indent
//! stripping, line joining, folding for `==` values, and `\"` unescaping
//! for double-quoted values.

use crate::token::Quotes;

/// Reconstruct the text of a scanned value.
///
/// `raw` is the source slice of the value's interval. `structural_indent` is
/// the indent budget of continuation lines: up to that many leading indent
/// characters per line are structure, everything beyond is content. `folded`
/// joins single line breaks with a space, keeps blank lines as real breaks
/// and swallows exactly one leading blank line.
pub fn value_text(raw: &str, structural_indent: usize, quotes: Quotes, folded: bool) -> String {
    let mut lines = raw.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let first = lines.next().unwrap_or("");
    let rest: Vec<&str> = lines.map(|l| strip_indent(l, structural_indent)).collect();

    let text = if rest.is_empty() {
        first.to_string()
    } else {
        // A value that began empty at the end of its own line starts with
        // the remnant of that line; it is not content.
        let mut all = Vec::with_capacity(rest.len() + 1);
        if !first.is_empty() {
            all.push(first);
        }
        all.extend(rest);
        if folded { fold(&all) } else { all.join("\n") }
    };

    match quotes {
        Quotes::Double => text.replace("\\\"", "\""),
        _ => text,
    }
}

/// Strip up to `budget` leading indent characters from a line.
fn strip_indent(line: &str, budget: usize) -> &str {
    let mut stripped = 0;
    let mut rest = line;
    while stripped < budget {
        match rest.chars().next() {
            Some(' ' | '\t') => {
                rest = &rest[1..];
                stripped += 1;
            }
            _ => break,
        }
    }
    rest
}

/// Join lines the folded way: single breaks become one space, blank lines
/// become real breaks, and exactly one leading blank line is swallowed.
fn fold(lines: &[&str]) -> String {
    let mut lines = lines;
    if lines.first().is_some_and(|line| line.is_empty()) {
        lines = &lines[1..];
    }
    let mut out = String::new();
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            out.push('\n');
        } else {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push(' ');
            }
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        assert_eq!(value_text("hello world", 0, Quotes::None, false), "hello world");
        assert_eq!(value_text("a\\\"b", 0, Quotes::Double, false), "a\"b");
        // Single quotes have no escapes.
        assert_eq!(value_text("a\\\"b", 0, Quotes::Single, false), "a\\\"b");
    }

    #[test]
    fn test_multi_line_open_string() {
        // `a =` with the value on the two following lines, unit = 4.
        let raw = "\n    one\n    two";
        assert_eq!(value_text(raw, 4, Quotes::None, false), "one\ntwo");
    }

    #[test]
    fn test_content_deeper_than_budget() {
        // Characters beyond the structural budget are content.
        let raw = "\n      one\n    two";
        assert_eq!(value_text(raw, 4, Quotes::None, false), "  one\ntwo");
    }

    #[test]
    fn test_multi_line_quoted() {
        // `a = "one\n    two"`: the first line starts right after the quote.
        let raw = "one\n    two";
        assert_eq!(value_text(raw, 4, Quotes::Double, false), "one\ntwo");
    }

    #[test]
    fn test_folded_joins_with_spaces() {
        let raw = "\n    one\n    two";
        assert_eq!(value_text(raw, 4, Quotes::None, true), "one two");
    }

    #[test]
    fn test_folded_blank_line_is_a_break() {
        let raw = "\n    one\n    two\n\n    three";
        assert_eq!(value_text(raw, 4, Quotes::None, true), "one two\nthree");
    }

    #[test]
    fn test_folded_swallows_one_leading_blank() {
        let raw = "\n\n    one";
        assert_eq!(value_text(raw, 4, Quotes::None, true), "one");
        let raw = "\n\n\n    one";
        assert_eq!(value_text(raw, 4, Quotes::None, true), "\none");
    }
}
