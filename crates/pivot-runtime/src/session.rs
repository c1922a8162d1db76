//! Holds the record set of the most recently loaded workbook.
//!
//! Each load fully replaces the previous result. Loads are tagged with a
//! generation number; a result that arrives after a newer load has started
//! is dropped. A failed load leaves the previous data untouched and records a
//! status message for display.

use std::path::Path;
use std::time::{Duration, Instant};

use pivot_core::error::{ReportError, Result};
use pivot_data::analysis::{analyze_bytes, AnalysisResult, SheetLabels};

// ── LoadStatus ────────────────────────────────────────────────────────────────

/// Outcome of the most recent load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Nothing has been loaded yet.
    Idle,
    /// A load is in flight.
    Loading { source: String },
    /// The last load succeeded.
    Loaded { source: String, records: usize },
    /// The last load failed; the message is meant for display.
    Failed { source: String, message: String },
}

impl LoadStatus {
    /// One-line description suitable for a status bar.
    pub fn message(&self) -> String {
        match self {
            LoadStatus::Idle => "No file loaded.".to_string(),
            LoadStatus::Loading { source } => format!("Reading {}...", source),
            LoadStatus::Loaded { source, records } => {
                format!("{}: {} records loaded.", source, records)
            }
            LoadStatus::Failed { message, .. } => message.clone(),
        }
    }
}

/// Handle identifying one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

// ── ReportSession ─────────────────────────────────────────────────────────────

/// The in-memory data set behind a report.
///
/// # Example
/// ```no_run
/// use pivot_data::analysis::SheetLabels;
/// use pivot_runtime::session::ReportSession;
///
/// # async fn run() {
/// let mut session = ReportSession::new(SheetLabels::default());
/// if let Some(result) = session.load_path("turno.xlsx".as_ref()).await {
///     println!("{} records", result.records.len());
/// }
/// println!("{}", session.status().message());
/// # }
/// ```
pub struct ReportSession {
    labels: SheetLabels,
    current: Option<AnalysisResult>,
    status: LoadStatus,
    /// Generation of the newest load started.
    generation: u64,
    loaded_at: Option<Instant>,
}

impl ReportSession {
    pub fn new(labels: SheetLabels) -> Self {
        Self {
            labels,
            current: None,
            status: LoadStatus::Idle,
            generation: 0,
            loaded_at: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Read `path` asynchronously, analyse it and make it the current data.
    ///
    /// Returns the current result afterwards: the new one on success, the
    /// previous one (if any) on failure.
    pub async fn load_path(&mut self, path: &Path) -> Option<&AnalysisResult> {
        let source = path.display().to_string();
        let ticket = self.begin_load(&source);
        let outcome = match read_file(path).await {
            Ok(bytes) => analyze_bytes(bytes, &self.labels),
            Err(e) => Err(e),
        };
        self.complete(ticket, &source, outcome);
        self.current.as_ref()
    }

    /// Analyse an in-memory file, e.g. one received from an upload.
    pub fn load_bytes(&mut self, source: &str, bytes: Vec<u8>) -> Option<&AnalysisResult> {
        let ticket = self.begin_load(source);
        let outcome = analyze_bytes(bytes, &self.labels);
        self.complete(ticket, source, outcome);
        self.current.as_ref()
    }

    /// Register a new load, superseding any load still in flight.
    pub fn begin_load(&mut self, source: &str) -> LoadTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading {
            source: source.to_string(),
        };
        tracing::debug!(generation = self.generation, source, "load started");
        LoadTicket(self.generation)
    }

    /// Apply the outcome of the load identified by `ticket`.
    ///
    /// Returns `false` (and changes nothing) when a newer load has started
    /// since `ticket` was issued.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        source: &str,
        outcome: Result<AnalysisResult>,
    ) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                stale = ticket.0,
                current = self.generation,
                "discarding superseded load"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(source, records = result.records.len(), "data set replaced");
                self.status = LoadStatus::Loaded {
                    source: source.to_string(),
                    records: result.records.len(),
                };
                self.current = Some(result);
                self.loaded_at = Some(Instant::now());
            }
            Err(e) => {
                tracing::warn!(source, error = %e, "load failed; keeping previous data");
                self.status = LoadStatus::Failed {
                    source: source.to_string(),
                    message: e.status_message(),
                };
            }
        }
        true
    }

    /// The current analysis, if any load has succeeded.
    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Time since the current data was loaded.
    pub fn data_age(&self) -> Option<Duration> {
        self.loaded_at.map(|ts| ts.elapsed())
    }

    /// Drop the current data set.
    pub fn clear(&mut self) {
        self.current = None;
        self.loaded_at = None;
        self.status = LoadStatus::Idle;
        tracing::debug!("data set cleared");
    }
}

/// Read a whole file without blocking the runtime.
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ReportError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
