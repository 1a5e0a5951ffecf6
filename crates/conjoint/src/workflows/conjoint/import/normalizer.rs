/// Markers spreadsheet exports commonly use for an empty cell.
const MISSING_MARKERS: &[&str] = &["na", "n/a", "nan", "null", "none", "#n/a"];

/// Strips invisible characters and surrounding whitespace. Missing-value
/// markers normalise to the empty string.
pub(crate) fn normalize_cell(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let trimmed = cleaned.trim();
    if is_missing_marker(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}
