//! End-to-end pipeline: locate both pivot sheets, parse them, reconcile the
//! tuples and compute the aggregates, returning an [`AnalysisResult`] ready
//! for the report layer.

use chrono::Utc;
use pivot_core::error::{ReportError, Result};
use pivot_core::models::{HourAggregate, PivotTuple, UnifiedRecord, UserAggregate};
use pivot_core::settings::{DEFAULT_CASES_SHEET, DEFAULT_UNITS_SHEET};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::{self, Summary, UserShare};
use crate::locator::locate;
use crate::parser::PivotParser;
use crate::reconciler::merge;
use crate::workbook::{CalamineWorkbook, WorkbookSource};

// ── Public types ──────────────────────────────────────────────────────────────

/// Expected labels of the two pivot sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLabels {
    pub units: String,
    pub cases: String,
}

impl SheetLabels {
    pub fn new(units: impl Into<String>, cases: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            cases: cases.into(),
        }
    }
}

impl Default for SheetLabels {
    fn default() -> Self {
        Self::new(DEFAULT_UNITS_SHEET, DEFAULT_CASES_SHEET)
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Sheet actually read for unit counts, if one matched.
    pub units_sheet: Option<String>,
    /// Sheet actually read for case counts, if one matched.
    pub cases_sheet: Option<String>,
    pub unit_tuples: usize,
    pub case_tuples: usize,
    /// Wall-clock seconds spent parsing, merging and aggregating.
    pub parse_time_seconds: f64,
}

/// One point of the hourly trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub hour: u8,
    pub total: f64,
    /// Trailing moving average of `total`.
    pub average: f64,
    /// Running total up to and including this hour.
    pub cumulative: f64,
}

/// The complete output of one workbook analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Reconciled records, ordered by user then hour.
    pub records: Vec<UnifiedRecord>,
    /// Per-user sums, largest total first.
    pub per_user: Vec<UserAggregate>,
    /// Per-hour sums, ascending hour.
    pub per_hour: Vec<HourAggregate>,
    pub summary: Summary,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Hourly totals with their moving average and running sum.
    pub fn hourly_trend(&self, window: usize) -> Vec<TrendPoint> {
        let totals: Vec<f64> = self.per_hour.iter().map(|h| h.total).collect();
        let averages = aggregator::moving_average(&totals, window);
        let cumulative = aggregator::cumulative_sum(&totals);

        self.per_hour
            .iter()
            .zip(averages)
            .zip(cumulative)
            .map(|((h, average), cumulative)| TrendPoint {
                hour: h.hour,
                total: h.total,
                average,
                cumulative,
            })
            .collect()
    }

    /// Users ranked by total with their share of the grand total.
    pub fn user_shares(&self) -> Vec<UserShare> {
        aggregator::user_shares(&self.per_user)
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Decode `bytes` as a spreadsheet and run [`analyze_workbook`] on it.
pub fn analyze_bytes(bytes: Vec<u8>, labels: &SheetLabels) -> Result<AnalysisResult> {
    let mut workbook = CalamineWorkbook::from_bytes(bytes)?;
    analyze_workbook(&mut workbook, labels)
}

/// Run the full pipeline over an open workbook.
///
/// 1. Locate the unit and case sheets by label.
/// 2. Parse each located sheet into tuples (a missing sheet yields none).
/// 3. Merge the tuples into unified records.
/// 4. Compute per-user, per-hour and summary aggregates.
///
/// Fails with [`ReportError::SheetNotFound`] when neither sheet matches and
/// with [`ReportError::EmptyResult`] when both parses come back empty.
pub fn analyze_workbook<W: WorkbookSource + ?Sized>(
    workbook: &mut W,
    labels: &SheetLabels,
) -> Result<AnalysisResult> {
    let names = workbook.sheet_names();
    let units_sheet = locate(&names, &labels.units).map(|i| names[i].clone());
    let cases_sheet = locate(&names, &labels.cases).map(|i| names[i].clone());

    if units_sheet.is_none() && cases_sheet.is_none() {
        warn!(
            "Neither {:?} nor {:?} matched sheets {:?}",
            labels.units, labels.cases, names
        );
        return Err(ReportError::SheetNotFound {
            units: labels.units.clone(),
            cases: labels.cases.clone(),
        });
    }

    let start = std::time::Instant::now();
    let parser = PivotParser::new();

    let unit_tuples = read_tuples(workbook, &parser, units_sheet.as_deref(), &labels.units)?;
    let case_tuples = read_tuples(workbook, &parser, cases_sheet.as_deref(), &labels.cases)?;

    if unit_tuples.is_empty() && case_tuples.is_empty() {
        let found: Vec<String> = units_sheet
            .iter()
            .chain(cases_sheet.iter())
            .cloned()
            .collect();
        warn!("Pivot sheets {:?} yielded no data", found);
        return Err(ReportError::EmptyResult(found));
    }

    let records = merge(&unit_tuples, &case_tuples);
    let per_user = aggregator::per_user(&records);
    let per_hour = aggregator::per_hour(&records);
    let summary = Summary::from_parts(&records, &per_user, &per_hour);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        units_sheet,
        cases_sheet,
        unit_tuples: unit_tuples.len(),
        case_tuples: case_tuples.len(),
        parse_time_seconds: start.elapsed().as_secs_f64(),
    };

    info!(
        "Analysed {} records for {} users over {} hours",
        records.len(),
        summary.users,
        summary.active_hours
    );

    Ok(AnalysisResult {
        records,
        per_user,
        per_hour,
        summary,
        metadata,
    })
}

fn read_tuples<W: WorkbookSource + ?Sized>(
    workbook: &mut W,
    parser: &PivotParser,
    sheet: Option<&str>,
    label: &str,
) -> Result<Vec<PivotTuple>> {
    let Some(sheet) = sheet else {
        warn!("No sheet matches {:?}; treating it as empty", label);
        return Ok(Vec::new());
    };
    let matrix = workbook.sheet_matrix(sheet)?;
    let tuples = parser.parse(&matrix);
    debug!("Sheet {:?}: {} rows, {} tuples", sheet, matrix.len(), tuples.len());
    Ok(tuples)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
