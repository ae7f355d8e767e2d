//! Diagnostic rendering for parser errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use syntactik_parse::{ErrorKind, ParseError};

/// Render `error` with ariadne.
///
/// Returns a string containing the formatted error message with source
/// context.
pub fn render(error: &ParseError, filename: &str, source: &str) -> String {
    let mut output = Vec::new();
    write_report(error, filename, source, &mut output);
    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}

/// Write the error report to a writer.
pub fn write_report<W: std::io::Write>(
    error: &ParseError,
    filename: &str,
    source: &str,
    writer: W,
) {
    let report = build_report(error, filename, source);
    let _ = report
        .finish()
        .write((filename, Source::from(source)), writer);
}

/// The byte range a report points at, widened to at least one character so
/// the label stays visible.
fn label_range(error: &ParseError, source: &str) -> std::ops::Range<usize> {
    if error.span.is_empty() {
        return 0..0;
    }
    let begin = error.span.begin.index.min(source.len());
    let end = error.span.end.index.clamp(begin, source.len());
    if begin == end && begin < source.len() {
        let width = source[begin..]
            .chars()
            .next()
            .map(|c| c.len_utf8())
            .unwrap_or(1);
        begin..begin + width
    } else {
        begin..end
    }
}

fn build_report<'a>(
    error: &ParseError,
    filename: &'a str,
    source: &str,
) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
    let range = label_range(error, source);

    match &error.kind {
        ErrorKind::UnexpectedCharacters(found) => {
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("unexpected character(s) '{found}'"))
                .with_label(
                    Label::new((filename, range))
                        .with_message("cannot appear here")
                        .with_color(Color::Red),
                )
        }

        ErrorKind::Expected(token) => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(format!("{token} is expected"))
            .with_label(
                Label::new((filename, range))
                    .with_message(format!("expected {token} here"))
                    .with_color(Color::Red),
            ),

        ErrorKind::InvalidIndentation => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message("invalid indentation")
            .with_label(
                Label::new((filename, range))
                    .with_message("this line starts too far left")
                    .with_color(Color::Red),
            )
            .with_help("a line inside (...) cannot start left of the line that opened the group"),

        ErrorKind::BlockIndentMismatch => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message("block indent mismatch")
            .with_label(
                Label::new((filename, range))
                    .with_message("does not match the block's established indent")
                    .with_color(Color::Red),
            )
            .with_help("all children of a block share one indent"),

        ErrorKind::InvalidIndentMultiplicity => {
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("invalid indent multiplicity")
                .with_label(
                    Label::new((filename, range))
                        .with_message("not a whole number of indent units")
                        .with_color(Color::Red),
                )
                .with_help("every indent must be a multiple of the first indent in the module")
        }

        ErrorKind::MixedIndentation => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message("mixed indentation")
            .with_label(
                Label::new((filename, range))
                    .with_message("spaces and tabs mixed in one indent")
                    .with_color(Color::Red),
            )
            .with_help("indent with spaces or with tabs, not both"),

        ErrorKind::InvalidIndentationSize => {
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("invalid indentation size")
                .with_label(
                    Label::new((filename, range))
                        .with_message("indented more than one level deeper")
                        .with_color(Color::Red),
                )
                .with_help("indent at most one level deeper than the line above")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors(source: &str) -> Vec<ParseError> {
        crate::parse(source).1
    }

    fn stripped(rendered: &str) -> String {
        String::from_utf8(strip_ansi_escapes::strip(rendered)).unwrap()
    }

    #[test]
    fn test_render_unexpected_character() {
        let source = "a = 1\n)";
        let errors = errors(source);
        assert_eq!(errors.len(), 1);
        let report = stripped(&render(&errors[0], "test.syn", source));
        assert!(report.contains("unexpected character(s) ')'"), "{report}");
        assert!(report.contains("test.syn"), "{report}");
    }

    #[test]
    fn test_render_indent_diagnostics() {
        let source = "a:\n  b = 1\n   c = 2";
        let errors = errors(source);
        let rendered: Vec<String> = errors
            .iter()
            .map(|e| stripped(&render(e, "test.syn", source)))
            .collect();
        assert!(
            rendered.iter().any(|r| r.contains("invalid indent multiplicity")),
            "{rendered:?}"
        );
        assert!(
            rendered.iter().any(|r| r.contains("block indent mismatch")),
            "{rendered:?}"
        );
    }

    #[test]
    fn test_render_missing_quote() {
        let source = "a = \"oops";
        let errors = errors(source);
        assert_eq!(errors.len(), 1);
        let report = stripped(&render(&errors[0], "test.syn", source));
        assert!(report.contains("\" is expected"), "{report}");
    }
}
