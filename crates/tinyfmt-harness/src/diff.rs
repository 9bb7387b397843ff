//! Diff rendering for fixture comparison.
//!
//! Formatter output is usually a single short line where the interesting
//! part is often whitespace or a control byte, so both sides are shown
//! escaped with a caret under the first differing character.

/// Render a diff between expected and actual output.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let expected_chars: Vec<char> = expected.chars().collect();
    let actual_chars: Vec<char> = actual.chars().collect();
    let first = expected_chars
        .iter()
        .zip(&actual_chars)
        .position(|(e, a)| e != a)
        .unwrap_or_else(|| expected_chars.len().min(actual_chars.len()));

    let column: usize = expected_chars[..first].iter().map(|&c| escape(c).len()).sum();

    let mut out = String::new();
    out.push_str(&format!("--- expected ({} chars)\n", expected_chars.len()));
    out.push_str(&format!("+++ actual ({} chars)\n", actual_chars.len()));
    out.push_str(&format!("@@ char {} @@\n", first + 1));
    out.push_str(&format!("-\"{}\"\n", escaped(expected)));
    out.push_str(&format!("+\"{}\"\n", escaped(actual)));
    out.push_str(&format!("  {}^\n", " ".repeat(column)));
    out
}

fn escaped(s: &str) -> String {
    s.chars().map(escape).collect()
}

fn escape(c: char) -> String {
    match c {
        '"' => String::from("\\\""),
        '\\' => String::from("\\\\"),
        c if c.is_control() => c.escape_default().to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs() {
        assert_eq!(render_diff("abc", "abc"), "[identical]");
    }

    #[test]
    fn caret_marks_first_difference() {
        let diff = render_diff("  007", " 0007");
        let lines: Vec<&str> = diff.lines().collect();
        assert_eq!(lines[2], "@@ char 2 @@");
        assert_eq!(lines[3], "-\"  007\"");
        assert_eq!(lines[4], "+\" 0007\"");
        assert_eq!(lines[5], "   ^");
    }

    #[test]
    fn prefix_difference_points_past_shorter_side() {
        let diff = render_diff("abc", "ab");
        assert!(diff.contains("@@ char 3 @@"));
        assert!(diff.contains("+++ actual (2 chars)"));
    }

    #[test]
    fn control_bytes_are_escaped() {
        let diff = render_diff("a\tb", "a b");
        assert!(diff.contains("-\"a\\tb\""));
    }
}
