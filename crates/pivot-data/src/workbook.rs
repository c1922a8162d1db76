//! Workbook access for the pivot pipeline.
//!
//! The parser only needs sheet names and raw cell matrices, so everything
//! downstream works against the [`WorkbookSource`] trait. [`CalamineWorkbook`]
//! decodes real spreadsheet bytes; [`MemoryWorkbook`] holds matrices built in
//! code.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use pivot_core::error::{ReportError, Result};
use pivot_core::models::{Cell, CellMatrix};
use tracing::debug;

/// Read-only view of a workbook: ordered sheet names plus per-sheet cells.
pub trait WorkbookSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// All rows of `name`, missing cells as [`Cell::Empty`].
    fn sheet_matrix(&mut self, name: &str) -> Result<CellMatrix>;
}

// ── MemoryWorkbook ────────────────────────────────────────────────────────────

/// A workbook assembled from in-memory matrices.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, CellMatrix)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet and return `self` for chaining.
    pub fn with_sheet(mut self, name: impl Into<String>, matrix: CellMatrix) -> Self {
        self.sheets.push((name.into(), matrix));
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn sheet_matrix(&mut self, name: &str) -> Result<CellMatrix> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m.clone())
            .ok_or_else(|| ReportError::UnreadableFile(format!("no sheet named {}", name)))
    }
}

// ── CalamineWorkbook ──────────────────────────────────────────────────────────

/// Spreadsheet decoded with `calamine` from an in-memory buffer.
///
/// The format (xlsx, xlsm, xlsb, xls, ods) is sniffed from the bytes.
pub struct CalamineWorkbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl CalamineWorkbook {
    /// Decode a workbook from raw file bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let size = bytes.len();
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ReportError::UnreadableFile(e.to_string()))?;
        debug!("Decoded workbook of {} bytes", size);
        Ok(Self { sheets })
    }

    /// Read `path` fully and decode it.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| ReportError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes)
    }
}

impl WorkbookSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn sheet_matrix(&mut self, name: &str) -> Result<CellMatrix> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| ReportError::UnreadableFile(format!("sheet {}: {}", name, e)))?;
        Ok(range_to_matrix(&range))
    }
}

/// Convert a calamine range into owned rows.
///
/// Leading columns outside the used range are padded with empty cells so
/// column indices stay absolute.
fn range_to_matrix(range: &Range<Data>) -> CellMatrix {
    let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(convert_cell));
            cells
        })
        .collect()
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}
