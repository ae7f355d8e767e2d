//! Test-only helpers for asserting parser diagnostics against annotated
//! source.
//!
//! An annotated source block interleaves source lines with caret lines:
//!
//! ```text
//! a ==== b
//!     ^^ UnexpectedCharacters
//! ```
//!
//! A caret line marks where, on the source line directly above it, an error
//! of the named kind is expected to begin. [`source_without_annotations`]
//! strips the caret lines (and one leading newline, so annotated blocks can
//! be written as raw strings starting on their own line);
//! [`assert_annotated_errors`] compares expectations with what a parse
//! actually reported.

/// An error actually reported by a parse, reduced to what annotations can
/// express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualError {
    /// Error kind name, e.g. `"UnexpectedCharacters"`.
    pub kind: String,
    /// 1-based line of the error's begin position.
    pub line: u32,
    /// 1-based column of the error's begin position.
    pub column: u32,
}

fn is_annotation(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('^')
}

/// The source text with annotation lines removed.
pub fn source_without_annotations(annotated: &str) -> String {
    let annotated = annotated.strip_prefix('\n').unwrap_or(annotated);
    let mut lines: Vec<&str> = annotated.lines().filter(|l| !is_annotation(l)).collect();
    // A trailing empty line is an artifact of the raw-string layout.
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines.join("\n")
}

/// The (kind, line, column) triples an annotated block expects, in source
/// order.
pub fn expected_errors(annotated: &str) -> Vec<ActualError> {
    let annotated = annotated.strip_prefix('\n').unwrap_or(annotated);
    let mut expected = Vec::new();
    let mut source_line: u32 = 0;
    for line in annotated.lines() {
        if !is_annotation(line) {
            source_line += 1;
            continue;
        }
        let column = line.find('^').unwrap() as u32 + 1;
        let kind = line
            .trim_start()
            .trim_start_matches('^')
            .trim()
            .to_string();
        assert!(
            !kind.is_empty(),
            "annotation line {line:?} names no error kind"
        );
        assert!(source_line > 0, "annotation before any source line");
        expected.push(ActualError {
            kind,
            line: source_line,
            column,
        });
    }
    expected
}

/// Assert that `actual` (in source order) matches the annotations in
/// `annotated`.
pub fn assert_annotated_errors(annotated: &str, actual: Vec<ActualError>) {
    let expected = expected_errors(annotated);
    assert_eq!(
        expected, actual,
        "diagnostics do not match annotations in:\n{annotated}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNOTATED: &str = "
a ==== b
    ^^ UnexpectedCharacters
c:
^ BlockIndentMismatch
";

    #[test]
    fn test_source_without_annotations() {
        assert_eq!(source_without_annotations(ANNOTATED), "a ==== b\nc:");
    }

    #[test]
    fn test_expected_errors() {
        assert_eq!(
            expected_errors(ANNOTATED),
            vec![
                ActualError {
                    kind: "UnexpectedCharacters".into(),
                    line: 1,
                    column: 5,
                },
                ActualError {
                    kind: "BlockIndentMismatch".into(),
                    line: 2,
                    column: 1,
                },
            ]
        );
    }
}
