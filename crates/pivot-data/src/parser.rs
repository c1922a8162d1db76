//! Pivot sheet parser: turns one sheet's cells into `(user, hour, value)`
//! tuples.

use pivot_core::models::{Cell, PivotTuple};
use tracing::debug;

use crate::header::{detect_layout, HeaderLayout, HeaderMatcher, TolerantMatcher};

/// Parser over a pluggable [`HeaderMatcher`].
#[derive(Debug, Clone, Default)]
pub struct PivotParser<M = TolerantMatcher> {
    matcher: M,
}

impl PivotParser<TolerantMatcher> {
    pub fn new() -> Self {
        Self::with_matcher(TolerantMatcher::new())
    }
}

impl<M: HeaderMatcher> PivotParser<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Extract every populated `(user, hour)` cell below the header row.
    ///
    /// Returns an empty vector when the sheet has no recognisable header.
    /// Rows with a blank user are skipped, the first user cell containing
    /// `TOTAL` ends the walk, and cells that do not coerce to a finite number
    /// are dropped one by one. Output is in row-major, then column order.
    pub fn parse(&self, matrix: &[Vec<Cell>]) -> Vec<PivotTuple> {
        let Some(layout) = detect_layout(matrix, &self.matcher) else {
            debug!("No user header found in {} rows", matrix.len());
            return Vec::new();
        };

        let tuples = self.walk_rows(matrix, &layout);
        debug!(
            "Header at row {}, {} hour columns, {} tuples",
            layout.header_row,
            layout.hour_columns.len(),
            tuples.len()
        );
        tuples
    }

    fn walk_rows(&self, matrix: &[Vec<Cell>], layout: &HeaderLayout) -> Vec<PivotTuple> {
        let mut tuples = Vec::new();

        for row in &matrix[layout.header_row + 1..] {
            let user = cell_at(row, layout.user_column).as_text();
            let user = user.trim();
            if user.is_empty() {
                continue;
            }
            if self.matcher.is_terminator(user) {
                break;
            }

            for binding in &layout.hour_columns {
                if let Some(value) = cell_at(row, binding.column).as_number() {
                    tuples.push(PivotTuple::new(user, binding.hour, value));
                }
            }
        }

        tuples
    }
}

/// Parse `matrix` with the default tolerant matcher.
pub fn parse_pivot(matrix: &[Vec<Cell>]) -> Vec<PivotTuple> {
    PivotParser::new().parse(matrix)
}

fn cell_at(row: &[Cell], column: usize) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    row.get(column).unwrap_or(EMPTY)
}
