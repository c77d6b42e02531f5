// src/clean/markers.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Markers the logger prints once a capture run is over.
pub const DEFAULT_STOP_MARKERS: &str = "NORMAL data collection complete|DATA COLLECTION COMPLETE";

static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("ANSI escape pattern is valid"));

/// Remove terminal colour/cursor sequences such as `ESC[0;32m`.
pub fn strip_ansi(text: &str) -> std::borrow::Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

/// Lowercase substrings that end processing of a file once seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopMarkers {
    markers: Vec<String>,
}

impl StopMarkers {
    /// Parse a `|`-separated marker list. Pieces are trimmed and lowercased;
    /// empty pieces are dropped, so `""` disables stopping altogether.
    pub fn parse(list: &str) -> Self {
        let markers = list
            .split('|')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { markers }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.markers
    }

    /// True if any marker occurs in `line`, ignoring case and ANSI escapes.
    pub fn should_stop(&self, line: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        let sanitized = strip_ansi(line).to_lowercase();
        self.markers.iter().any(|m| sanitized.contains(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_markers_parse_lowercased() {
        let markers = StopMarkers::parse(DEFAULT_STOP_MARKERS);
        assert_eq!(
            markers.as_slice(),
            ["normal data collection complete", "data collection complete"]
        );
    }

    #[test]
    fn empty_list_disables_stopping() {
        let markers = StopMarkers::parse("");
        assert!(markers.is_empty());
        assert!(!markers.should_stop("DATA COLLECTION COMPLETE"));

        let markers = StopMarkers::parse(" | |");
        assert!(markers.is_empty());
    }

    #[test]
    fn matches_case_insensitively_inside_noise() {
        let markers = StopMarkers::parse("Data Collection Complete");
        assert!(markers.should_stop("I (1234) main: data collection COMPLETE, rebooting"));
        assert!(!markers.should_stop("12,0.98,50,10,1.2,0"));
    }

    #[test]
    fn escape_sequences_do_not_hide_markers() {
        let markers = StopMarkers::parse(DEFAULT_STOP_MARKERS);
        let line = "\x1b[0;32mI (9001) collector: DATA \x1b[1mCOLLECTION\x1b[0m COMPLETE\x1b[0m";
        assert!(markers.should_stop(line));
    }

    #[test]
    fn strip_ansi_leaves_plain_text_alone() {
        assert_eq!(strip_ansi("\x1b[31merror\x1b[0m: x"), "error: x");
        assert_eq!(strip_ansi("1,2,3"), "1,2,3");
    }
}
