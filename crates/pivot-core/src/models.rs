use serde::{Deserialize, Serialize};

use crate::formatting::parse_locale_number;

/// Highest hour-of-day accepted from a pivot header.
pub const MAX_HOUR: u8 = 23;

/// A single scalar value read from a worksheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing or blank cell.
    #[default]
    Empty,
    /// Any textual value, kept verbatim.
    Text(String),
    /// A value the workbook already stored as a number.
    Number(f64),
}

impl Cell {
    /// Text form of the cell. Numbers use their shortest decimal form
    /// (`8.0` renders as `"8"`), empty cells render as `""`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }

    /// Numeric value of the cell.
    ///
    /// Native numbers pass through unchanged; text goes through
    /// [`parse_locale_number`]. Returns `None` for anything that does not
    /// yield a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Number(_) => None,
            Cell::Text(s) => parse_locale_number(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Rows of cells exactly as read from one sheet. Rows may differ in length;
/// a missing trailing cell reads as [`Cell::Empty`].
pub type CellMatrix = Vec<Vec<Cell>>;

/// One `(user, hour, value)` observation extracted from a pivot sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTuple {
    pub user: String,
    /// Hour of day, always within `0..=23`.
    pub hour: u8,
    pub value: f64,
}

impl PivotTuple {
    pub fn new(user: impl Into<String>, hour: u8, value: f64) -> Self {
        Self {
            user: user.into(),
            hour,
            value,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.user.clone(), self.hour)
    }
}

/// Compound `(user, hour)` key identifying a unified record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub user: String,
    pub hour: u8,
}

impl RecordKey {
    pub fn new(user: impl Into<String>, hour: u8) -> Self {
        Self {
            user: user.into(),
            hour,
        }
    }
}

/// The reconciled units/cases observation for one user in one hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub user: String,
    pub hour: u8,
    pub units: f64,
    pub cases: f64,
}

impl UnifiedRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.user.clone(), self.hour)
    }
}

/// Units, cases and their sum, accumulated over a group of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub units: f64,
    pub cases: f64,
    pub total: f64,
}

impl Totals {
    /// Add one record's counts to the running totals.
    pub fn add_record(&mut self, record: &UnifiedRecord) {
        self.units += record.units;
        self.cases += record.cases;
        self.total = self.units + self.cases;
    }
}

/// Per-user sums over all hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAggregate {
    pub user: String,
    pub units: f64,
    pub cases: f64,
    pub total: f64,
}

/// Per-hour sums over all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourAggregate {
    pub hour: u8,
    pub units: f64,
    pub cases: f64,
    pub total: f64,
}
