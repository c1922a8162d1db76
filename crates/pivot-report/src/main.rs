mod bootstrap;
mod table_view;

use anyhow::{Context, Result};
use pivot_core::settings::Settings;
use pivot_data::analysis::SheetLabels;
use pivot_data::export::{export_csv, export_json};
use pivot_runtime::session::ReportSession;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("pivot-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, units sheet: {}, cases sheet: {}",
        settings.input.display(),
        settings.units_sheet,
        settings.cases_sheet
    );

    let labels = SheetLabels::new(settings.units_sheet.clone(), settings.cases_sheet.clone());
    let mut session = ReportSession::new(labels);

    session.load_path(&settings.input).await;
    let Some(result) = session.current() else {
        eprintln!("{}", session.status().message());
        std::process::exit(1);
    };

    let window = settings.window_len();
    let output = match settings.view.as_str() {
        "records" => table_view::render_records(result),
        "users" => table_view::render_users(result, None),
        "hours" => table_view::render_hours(result, window),
        _ => table_view::render_summary(result, settings.top, window),
    };
    print!("{}", output);

    if let Some(path) = &settings.export_csv {
        export_csv(&result.records, path)
            .with_context(|| format!("Failed to export CSV to {}", path.display()))?;
    }
    if let Some(path) = &settings.export_json {
        export_json(&result.records, path)
            .with_context(|| format!("Failed to export JSON to {}", path.display()))?;
    }

    eprintln!("{}", session.status().message());
    Ok(())
}
