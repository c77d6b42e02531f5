// src/clean/row.rs

use std::borrow::Cow;

/// A data row is either kept (normalised) or rejected with a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowVerdict {
    Kept { line: String, columns: usize },
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Comment,
    ColumnCount { expected: usize, found: usize },
    NotNumeric,
}

/// Drop `_` digit separators (`1_000`). `None` if an underscore is not
/// sitting between two ASCII digits.
fn strip_digit_separators(token: &str) -> Option<Cow<'_, str>> {
    if !token.contains('_') {
        return Some(Cow::Borrowed(token));
    }
    let bytes = token.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        let after = bytes.get(i + 1);
        match (before, after) {
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(Cow::Owned(token.replace('_', "")))
}

/// Non-empty token that parses to a finite `f64`.
///
/// Single underscores between digits are accepted as separators. Only ASCII
/// digits count; other Unicode decimal digits are rejected.
pub fn is_valid_number(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    strip_digit_separators(token)
        .is_some_and(|t| t.parse::<f64>().is_ok_and(f64::is_finite))
}

/// Validate one non-blank data line against the resolved column count.
///
/// Fields are trimmed and re-joined with bare commas.
pub fn clean_numeric_row(text: &str, expected_columns: Option<usize>) -> RowVerdict {
    let stripped = text.trim().trim_start_matches('\u{feff}');
    if stripped.starts_with('#') {
        return RowVerdict::Rejected(Rejection::Comment);
    }

    let parts: Vec<&str> = stripped.split(',').map(str::trim).collect();
    if let Some(expected) = expected_columns {
        if parts.len() != expected {
            return RowVerdict::Rejected(Rejection::ColumnCount {
                expected,
                found: parts.len(),
            });
        }
    }
    if !parts.iter().all(|p| is_valid_number(p)) {
        return RowVerdict::Rejected(Rejection::NotNumeric);
    }

    RowVerdict::Kept {
        line: parts.join(","),
        columns: parts.len(),
    }
}
