// src/clean/header.rs

/// Column layout written by the sensor firmware.
pub const EXPECTED_HEADER: &str = "time_ms,accel_mag_g,fan_pwm,vibration_pwm,current_a,event_code";

const BOM: char = '\u{feff}';

/// Number of columns in [`EXPECTED_HEADER`].
pub fn header_columns() -> usize {
    EXPECTED_HEADER.split(',').count()
}

/// Recognise the header, either bare or as a `# columns: ...` comment.
///
/// `line` is the raw line; whitespace and leading byte-order marks are
/// stripped here.
pub fn is_header(line: &str) -> bool {
    let stripped = line.trim().trim_start_matches(BOM);
    if stripped == EXPECTED_HEADER {
        return true;
    }
    if !stripped.starts_with('#') {
        return false;
    }

    let candidate = stripped.trim_start_matches('#').trim();
    let Some(prefix) = candidate.get(.."columns:".len()) else {
        return false;
    };
    if !prefix.eq_ignore_ascii_case("columns:") {
        return false;
    }
    candidate
        .split_once(':')
        .map(|(_, tail)| tail.trim() == EXPECTED_HEADER)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_has_six_columns() {
        assert_eq!(header_columns(), 6);
    }

    #[test]
    fn bare_header_with_bom_and_padding() {
        assert!(is_header(EXPECTED_HEADER));
        assert!(is_header(&format!("\u{feff}{EXPECTED_HEADER}\r\n")));
        assert!(is_header(&format!("   {EXPECTED_HEADER}  ")));
    }

    #[test]
    fn commented_header_variants() {
        assert!(is_header(&format!("# columns: {EXPECTED_HEADER}")));
        assert!(is_header(&format!("### COLUMNS:{EXPECTED_HEADER}   ")));
        assert!(!is_header(&format!("#Columns :{EXPECTED_HEADER}")));
    }

    #[test]
    fn near_misses_are_rejected() {
        assert!(!is_header("time_ms,accel_mag_g,fan_pwm"));
        assert!(!is_header(&EXPECTED_HEADER.to_uppercase()));
        assert!(!is_header(&format!("# cols: {EXPECTED_HEADER}")));
        assert!(!is_header("# columns"));
        assert!(!is_header("#"));
        assert!(!is_header(""));
    }
}
