//! Per-gear output framing

/// How gear output is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One line gets an inline `[label]` tag; several lines get a
    /// `=== label` header.
    #[default]
    Grouped,
    /// Every line gets the inline tag.
    AlwaysPrefix,
    /// No framing; output is passed through as it arrives.
    Raw,
}

/// Frames the complete output of one gear.
#[must_use]
pub fn format_gear_output(label: &str, lines: &[String], mode: OutputMode) -> Vec<String> {
    match (mode, lines) {
        (_, []) => Vec::new(),
        (OutputMode::Raw, _) => lines.to_vec(),
        (OutputMode::Grouped, [single]) => vec![format!("[{label}] {single}")],
        (OutputMode::Grouped, _) => std::iter::once(format!("=== {label}"))
            .chain(lines.iter().cloned())
            .collect(),
        (OutputMode::AlwaysPrefix, _) => lines
            .iter()
            .map(|line| format!("[{label}] {line}"))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_single_line_is_tagged_inline() {
        assert_eq!(
            format_gear_output("abc php-5.4", &lines(&["ok"]), OutputMode::Grouped),
            lines(&["[abc php-5.4] ok"])
        );
    }

    #[test]
    fn test_multi_line_gets_header() {
        assert_eq!(
            format_gear_output("abc", &lines(&["one", "two"]), OutputMode::Grouped),
            lines(&["=== abc", "one", "two"])
        );
    }

    #[test]
    fn test_always_prefix() {
        assert_eq!(
            format_gear_output("abc", &lines(&["one", "two"]), OutputMode::AlwaysPrefix),
            lines(&["[abc] one", "[abc] two"])
        );
    }

    #[test]
    fn test_raw_and_empty() {
        assert_eq!(
            format_gear_output("abc", &lines(&["one", "two"]), OutputMode::Raw),
            lines(&["one", "two"])
        );
        assert!(format_gear_output("abc", &[], OutputMode::Grouped).is_empty());
    }
}
