use crate::severity::{Severity, RESET};
use crate::value::Value;

pub const LINE_END: &str = "\n";

/// Wraps `content` in the color of `severity`.
///
/// Empty content is never colored, so the result is either empty or just the
/// line terminator.
pub fn decorate(content: &str, severity: Severity, append_newline: bool) -> String {
    let mut result = String::new();
    if !content.is_empty() {
        result.push_str(severity.color());
        result.push_str(content);
        if severity.needs_reset() {
            result.push_str(RESET);
        }
    }

    if append_newline {
        result.push_str(LINE_END);
    }

    result
}

/// Decorated prefix followed by the decorated payload, no terminator.
pub fn decorate_all(payload: &Value, severity: Severity, prefix: &str) -> String {
    let mut result = decorate(prefix, severity, false);
    result.push_str(&decorate(&payload.render(), severity, false));
    result
}

/// A complete console line: prefix, payload, suffix and the terminator.
pub fn compose(payload: &Value, severity: Severity, prefix: &str, suffix: &str) -> String {
    let mut result = decorate_all(payload, severity, prefix);
    result.push_str(&decorate(suffix, severity, true));
    result
}

/// Uncolored file row, terminated.
pub fn file_row(payload: &Value, prefix: &str, suffix: &str) -> String {
    format!("{}{}{}{}", prefix, payload.render(), suffix, LINE_END)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn error_line_is_red_with_reset_and_newline() {
        assert_eq!(
            decorate("fail", Severity::Error, true),
            "\x1b[31mfail\x1b[0m\n"
        );
    }

    #[test]
    fn empty_content_only_keeps_terminator() {
        assert_eq!(decorate("", Severity::Info, true), "\n");
        for severity in Severity::ALL {
            assert_eq!(decorate("", severity, false), "");
        }
    }

    #[test]
    fn colored_levels_open_and_close() {
        for severity in [Severity::Info, Severity::Warning, Severity::Error] {
            let out = decorate("msg", severity, false);
            assert!(out.starts_with(severity.color()));
            assert!(out.ends_with(RESET));

            let terminated = decorate("msg", severity, true);
            assert!(terminated.ends_with("\x1b[0m\n"));
        }
    }

    #[test]
    fn plain_has_no_escape_sequences() {
        assert_eq!(decorate("msg", Severity::Plain, false), "msg");
        assert_eq!(decorate("msg", Severity::Plain, true), "msg\n");
        assert!(!decorate("msg", Severity::Plain, true).contains('\x1b'));
    }

    #[test]
    fn decorate_all_colors_prefix_and_payload_separately() {
        let out = decorate_all(&Value::from("body"), Severity::Warning, "main.rs:3 [1.0]: ");
        assert_eq!(
            out,
            "\x1b[33mmain.rs:3 [1.0]: \x1b[0m\x1b[33mbody\x1b[0m"
        );
    }

    #[test]
    fn empty_payload_keeps_prefix_but_no_color_wrap() {
        let out = compose(&Value::from(""), Severity::Info, "p: ", "");
        assert_eq!(out, "\x1b[32mp: \x1b[0m\n");
    }

    #[test]
    fn structured_payload_renders_the_same_each_time() {
        let mut map = IndexMap::new();
        map.insert("k", Value::from(vec![1, 2]));
        let payload = Value::from(map);
        let first = compose(&payload, Severity::Error, "", "");
        assert_eq!(compose(&payload, Severity::Error, "", ""), first);
        assert!(first.contains("'k' => ["));
    }

    #[test]
    fn file_row_has_no_color() {
        assert_eq!(file_row(&Value::from("a"), "t: ", "!"), "t: a!\n");
    }
}
