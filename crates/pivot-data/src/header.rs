//! Header detection for pivot sheets.
//!
//! Matching is kept behind [`HeaderMatcher`] so the row walk in
//! [`crate::parser`] does not care how labels are recognised.

use pivot_core::models::{Cell, MAX_HOUR};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Header text that marks the user column.
pub const USER_HEADER: &str = "USUÁRIO";

/// Substring of the user column that ends the data block.
pub const TOTAL_MARKER: &str = "TOTAL";

/// Recognises the labels that give a pivot sheet its shape.
pub trait HeaderMatcher {
    /// `true` when `text` labels the user column.
    fn is_user_header(&self, text: &str) -> bool;

    /// Hour of day announced by a column header, if any.
    fn hour_of(&self, text: &str) -> Option<u8>;

    /// `true` when a user cell marks the end of the data rows.
    fn is_terminator(&self, text: &str) -> bool;
}

/// Default matcher: accepts "Hora 08", "08h", "8" and similar phrasings.
#[derive(Debug, Clone)]
pub struct TolerantMatcher {
    digits: Regex,
}

impl TolerantMatcher {
    pub fn new() -> Self {
        Self {
            digits: Regex::new(r"[0-9]{1,2}").expect("regex is valid"),
        }
    }
}

impl Default for TolerantMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderMatcher for TolerantMatcher {
    fn is_user_header(&self, text: &str) -> bool {
        normalize_header(text) == USER_HEADER
    }

    fn hour_of(&self, text: &str) -> Option<u8> {
        let found = self.digits.find(text)?;
        let hour: u8 = found.as_str().parse().ok()?;
        (hour <= MAX_HOUR).then_some(hour)
    }

    fn is_terminator(&self, text: &str) -> bool {
        normalize_header(text).contains(TOTAL_MARKER)
    }
}

/// Trim, compose accents (NFC) and uppercase.
pub fn normalize_header(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_uppercase()
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// A header column bound to an hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourColumn {
    pub column: usize,
    pub hour: u8,
}

/// Position of the header row, user column and hour columns in a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub header_row: usize,
    pub user_column: usize,
    /// In column order. Two columns may carry the same hour.
    pub hour_columns: Vec<HourColumn>,
}

/// Find the header layout of `matrix`, or `None` when no row carries the user
/// header label.
pub fn detect_layout<M: HeaderMatcher + ?Sized>(
    matrix: &[Vec<Cell>],
    matcher: &M,
) -> Option<HeaderLayout> {
    let (header_row, user_column) = matrix.iter().enumerate().find_map(|(r, row)| {
        row.iter()
            .position(|cell| matcher.is_user_header(&cell.as_text()))
            .map(|c| (r, c))
    })?;

    let hour_columns = matrix[header_row]
        .iter()
        .enumerate()
        .skip(user_column + 1)
        .filter_map(|(column, cell)| {
            matcher
                .hour_of(&cell.as_text())
                .map(|hour| HourColumn { column, hour })
        })
        .collect();

    Some(HeaderLayout {
        header_row,
        user_column,
        hour_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|s| Cell::from(*s)).collect()
    }

    #[test]
    fn test_user_header_variants() {
        let m = TolerantMatcher::new();
        assert!(m.is_user_header("USUÁRIO"));
        assert!(m.is_user_header("  usuário "));
        assert!(m.is_user_header("Usuário"));
        // Decomposed accent (A + combining acute) still matches.
        assert!(m.is_user_header("USUA\u{301}RIO"));
        assert!(!m.is_user_header("USUARIO"));
        assert!(!m.is_user_header("Usuário final"));
    }

    #[test]
    fn test_hour_extraction_tolerates_phrasing() {
        let m = TolerantMatcher::new();
        assert_eq!(m.hour_of("Hora 08"), Some(8));
        assert_eq!(m.hour_of("08h"), Some(8));
        assert_eq!(m.hour_of("8"), Some(8));
        assert_eq!(m.hour_of("0"), Some(0));
        assert_eq!(m.hour_of("das 23 às 24"), Some(23));
    }

    #[test]
    fn test_hour_out_of_range_is_ignored() {
        let m = TolerantMatcher::new();
        assert_eq!(m.hour_of("Hora 25"), None);
        assert_eq!(m.hour_of("Total"), None);
        assert_eq!(m.hour_of(""), None);
    }

    #[test]
    fn test_hour_takes_first_digit_run_of_at_most_two() {
        let m = TolerantMatcher::new();
        // "123" yields the run "12".
        assert_eq!(m.hour_of("Hora 123"), Some(12));
        assert_eq!(m.hour_of("Turno 1 - 14h"), Some(1));
    }

    #[test]
    fn test_hour_ignores_non_ascii_digits() {
        let m = TolerantMatcher::new();
        assert_eq!(m.hour_of("Turno \u{663} - 08h"), Some(8));
        assert_eq!(m.hour_of("\u{663}"), None);
    }

    #[test]
    fn test_terminator() {
        let m = TolerantMatcher::new();
        assert!(m.is_terminator("TOTAL"));
        assert!(m.is_terminator("Total Geral"));
        assert!(m.is_terminator("subtotal"));
        assert!(!m.is_terminator("Ana"));
    }

    #[test]
    fn test_detect_layout_finds_first_header_row() {
        let matrix = vec![
            row(&["Relatório de produtividade"]),
            row(&[]),
            row(&["", "USUÁRIO", "Hora 08", "Obs", "Hora 09"]),
            row(&["", "USUÁRIO", "Hora 10"]),
        ];
        let layout = detect_layout(&matrix, &TolerantMatcher::new()).unwrap();
        assert_eq!(layout.header_row, 2);
        assert_eq!(layout.user_column, 1);
        assert_eq!(
            layout.hour_columns,
            vec![
                HourColumn { column: 2, hour: 8 },
                HourColumn { column: 4, hour: 9 },
            ]
        );
    }

    #[test]
    fn test_detect_layout_ignores_columns_left_of_user() {
        let matrix = vec![row(&["08", "USUÁRIO", "09"])];
        let layout = detect_layout(&matrix, &TolerantMatcher::new()).unwrap();
        assert_eq!(layout.hour_columns, vec![HourColumn { column: 2, hour: 9 }]);
    }

    #[test]
    fn test_detect_layout_keeps_duplicate_hours() {
        let matrix = vec![row(&["USUÁRIO", "Hora 08", "08h"])];
        let layout = detect_layout(&matrix, &TolerantMatcher::new()).unwrap();
        assert_eq!(layout.hour_columns.len(), 2);
        assert!(layout.hour_columns.iter().all(|c| c.hour == 8));
    }

    #[test]
    fn test_detect_layout_numeric_header_cells() {
        let matrix = vec![vec![
            Cell::from("USUÁRIO"),
            Cell::Number(7.0),
            Cell::Number(8.0),
        ]];
        let layout = detect_layout(&matrix, &TolerantMatcher::new()).unwrap();
        let hours: Vec<u8> = layout.hour_columns.iter().map(|c| c.hour).collect();
        assert_eq!(hours, vec![7, 8]);
    }

    #[test]
    fn test_detect_layout_none_without_user_header() {
        let matrix = vec![row(&["Nome", "Hora 08"]), row(&["Ana", "3"])];
        assert!(detect_layout(&matrix, &TolerantMatcher::new()).is_none());
    }
}
