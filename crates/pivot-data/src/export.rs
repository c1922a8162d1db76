//! CSV and JSON serialisation of reconciled records.
//!
//! The CSV layout (`Usuario,Hora,Unidades,Caixas`, one line per record) is
//! consumed by spreadsheets downstream and must not change.

use std::io::Write;
use std::path::Path;

use csv::Writer;
use pivot_core::error::{ReportError, Result};
use pivot_core::formatting::format_plain;
use pivot_core::models::UnifiedRecord;
use serde::Serialize;
use tracing::info;

/// Column headers of the CSV export, in order.
pub const CSV_HEADER: [&str; 4] = ["Usuario", "Hora", "Unidades", "Caixas"];

/// Write `records` as CSV to any writer.
pub fn write_csv<W: Write>(records: &[UnifiedRecord], out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for r in records {
        wtr.write_record([
            r.user.clone(),
            r.hour.to_string(),
            format_plain(r.units),
            format_plain(r.cases),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render `records` as a CSV string.
pub fn to_csv_string(records: &[UnifiedRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ReportError::Export(e.to_string()))
}

/// Write `records` as CSV to `path`.
pub fn export_csv(records: &[UnifiedRecord], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| {
        ReportError::Export(format!("cannot create {}: {}", path.display(), e))
    })?;
    write_csv(records, file)?;
    info!("CSV exported to {} ({} records)", path.display(), records.len());
    Ok(())
}

/// Write any serialisable value as pretty JSON to `path`.
pub fn export_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| {
        ReportError::Export(format!("cannot write {}: {}", path.display(), e))
    })?;
    info!("JSON exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rec(user: &str, hour: u8, units: f64, cases: f64) -> UnifiedRecord {
        UnifiedRecord {
            user: user.to_string(),
            hour,
            units,
            cases,
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv_string(&[rec("Ana", 8, 10.0, 2.0), rec("Ana", 9, 5.5, 0.0)]).unwrap();
        assert_eq!(csv, "Usuario,Hora,Unidades,Caixas\nAna,8,10,2\nAna,9,5.5,0\n");
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        assert_eq!(to_csv_string(&[]).unwrap(), "Usuario,Hora,Unidades,Caixas\n");
    }

    #[test]
    fn test_csv_quotes_names_with_commas() {
        let csv = to_csv_string(&[rec("Silva, Ana", 7, 1.0, 1.0)]).unwrap();
        assert!(csv.contains("\"Silva, Ana\",7,1,1"));
    }

    #[test]
    fn test_export_csv_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registros.csv");
        export_csv(&[rec("Bia", 23, 3.0, 4.0)], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Usuario,Hora,Unidades,Caixas\nBia,23,3,4\n");
    }

    #[test]
    fn test_export_csv_bad_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = export_csv(&[], &path).unwrap_err();
        assert!(matches!(err, ReportError::Export(_)));
    }

    #[test]
    fn test_export_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registros.json");
        let records = vec![rec("Ana", 8, 10.0, 2.0)];
        export_json(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<UnifiedRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, records);
    }
}
