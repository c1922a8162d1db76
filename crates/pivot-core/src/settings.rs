use clap::Parser;
use std::path::PathBuf;

use crate::error::{ReportError, Result};

/// Default label of the sheet holding unit counts.
pub const DEFAULT_UNITS_SHEET: &str = "UNIDADES";

/// Default label of the sheet holding case counts.
pub const DEFAULT_CASES_SHEET: &str = "CAIXAS";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Reconcile hourly unit and case pivot sheets into a single report
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pivot-report",
    about = "Reconcile hourly unit and case pivot sheets into a single report",
    version
)]
pub struct Settings {
    /// Workbook to read (xlsx, xlsm, xls, xlsb or ods)
    pub input: PathBuf,

    /// Label of the sheet holding unit counts
    #[arg(long, default_value = DEFAULT_UNITS_SHEET)]
    pub units_sheet: String,

    /// Label of the sheet holding case counts
    #[arg(long, default_value = DEFAULT_CASES_SHEET)]
    pub cases_sheet: String,

    /// What to print
    #[arg(long, default_value = "summary", value_parser = ["summary", "records", "users", "hours"])]
    pub view: String,

    /// Moving-average window, in hours (1-24)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=24))]
    pub window: u32,

    /// Number of users listed in the summary
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Write the reconciled records as CSV to this path
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Write the reconciled records as JSON to this path
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but from an explicit argument list.
    pub fn parse_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings =
            Settings::try_parse_from(args).map_err(|e| ReportError::Config(e.to_string()))?;
        Ok(Self::resolve(settings))
    }

    /// Moving-average window as a slice length.
    pub fn window_len(&self) -> usize {
        self.window as usize
    }

    /// Apply the `--debug` flag and tidy the sheet labels.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        if settings.units_sheet.trim().is_empty() {
            settings.units_sheet = DEFAULT_UNITS_SHEET.to_string();
        }
        if settings.cases_sheet.trim().is_empty() {
            settings.cases_sheet = DEFAULT_CASES_SHEET.to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
