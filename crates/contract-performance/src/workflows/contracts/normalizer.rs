const INVISIBLE: [char; 3] = ['\u{feff}', '\u{200b}', '\u{00a0}'];

/// Header key used for alias lookup: invisible characters and all
/// whitespace removed, ASCII lowercased.
pub(crate) fn normalize_header(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !INVISIBLE.contains(ch) && !ch.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Trimmed cell text, or `None` when nothing visible is left.
pub(crate) fn clean_cell(value: &str) -> Option<String> {
    let cleaned = value.replace(INVISIBLE, "");
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_normalization_strips_bom_and_spacing() {
        assert_eq!(normalize_header("\u{feff}보험사"), "보험사");
        assert_eq!(normalize_header(" 수금자 명 "), "수금자명");
        assert_eq!(normalize_header("Premium"), "premium");
    }

    #[test]
    fn blank_cells_become_none() {
        assert_eq!(clean_cell("  "), None);
        assert_eq!(clean_cell("\u{200b}"), None);
        assert_eq!(clean_cell(" 월납 "), Some("월납".to_string()));
    }
}
