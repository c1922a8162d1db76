//! Plain-text tables for the report views.
//!
//! Columns are padded by display width so accented user names line up.

use pivot_core::formatting::{format_hour, format_number};
use pivot_data::analysis::AnalysisResult;
use unicode_width::UnicodeWidthStr;

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A header row, data rows and an optional highlighted totals row.
#[derive(Debug, Clone)]
pub struct TextTable {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
    footer: Option<Vec<String>>,
}

impl TextTable {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            align: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
            footer: None,
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn footer(&mut self, row: Vec<String>) {
        self.footer = Some(row);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|c| {
                std::iter::once(&self.headers)
                    .chain(self.rows.iter())
                    .chain(self.footer.iter())
                    .filter_map(|row| row.get(c))
                    .map(|cell| UnicodeWidthStr::width(cell.as_str()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let rule = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");

        let mut out = String::new();
        out.push_str(&self.line(&self.headers, &widths));
        out.push_str(&rule);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&self.line(row, &widths));
        }
        if let Some(footer) = &self.footer {
            out.push_str(&rule);
            out.push('\n');
            out.push_str(&self.line(footer, &widths));
        }
        out
    }

    fn line(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(c, width)| {
                let text = row.get(c).map(String::as_str).unwrap_or("");
                let pad = " ".repeat(width.saturating_sub(UnicodeWidthStr::width(text)));
                match self.align[c] {
                    Align::Left => format!("{}{}", text, pad),
                    Align::Right => format!("{}{}", pad, text),
                }
            })
            .collect();
        format!("{}\n", cells.join(" | ").trim_end())
    }
}

fn count(value: f64) -> String {
    if value.fract() == 0.0 {
        format_number(value, 0)
    } else {
        format_number(value, 1)
    }
}

// ── Views ─────────────────────────────────────────────────────────────────────

/// Every reconciled record, in record order.
pub fn render_records(result: &AnalysisResult) -> String {
    let mut table = TextTable::new(&[
        ("Usuário", Align::Left),
        ("Hora", Align::Right),
        ("Unidades", Align::Right),
        ("Caixas", Align::Right),
    ]);
    for r in &result.records {
        table.push(vec![
            r.user.clone(),
            format_hour(r.hour),
            count(r.units),
            count(r.cases),
        ]);
    }
    let t = &result.summary.totals;
    table.footer(vec![
        "TOTAL".to_string(),
        String::new(),
        count(t.units),
        count(t.cases),
    ]);
    table.render()
}

/// Users ranked by total with their Pareto share. `limit` caps the rows.
pub fn render_users(result: &AnalysisResult, limit: Option<usize>) -> String {
    let mut table = TextTable::new(&[
        ("#", Align::Right),
        ("Usuário", Align::Left),
        ("Unidades", Align::Right),
        ("Caixas", Align::Right),
        ("Total", Align::Right),
        ("%", Align::Right),
        ("% acum.", Align::Right),
    ]);
    let shares = result.user_shares();
    let take = limit.unwrap_or(usize::MAX);
    for (i, (user, share)) in result.per_user.iter().zip(&shares).take(take).enumerate() {
        table.push(vec![
            (i + 1).to_string(),
            user.user.clone(),
            count(user.units),
            count(user.cases),
            count(user.total),
            format_number(share.share, 1),
            format_number(share.cumulative_share, 1),
        ]);
    }
    let t = &result.summary.totals;
    table.footer(vec![
        String::new(),
        format!("{} usuários", result.per_user.len()),
        count(t.units),
        count(t.cases),
        count(t.total),
        String::new(),
        String::new(),
    ]);
    table.render()
}

/// Hourly totals with the moving average and running total.
pub fn render_hours(result: &AnalysisResult, window: usize) -> String {
    let avg_header = format!("Média ({}h)", window);
    let mut table = TextTable::new(&[
        ("Hora", Align::Left),
        ("Unidades", Align::Right),
        ("Caixas", Align::Right),
        ("Total", Align::Right),
        (avg_header.as_str(), Align::Right),
        ("Acumulado", Align::Right),
    ]);
    for (h, point) in result.per_hour.iter().zip(result.hourly_trend(window)) {
        table.push(vec![
            format_hour(h.hour),
            count(h.units),
            count(h.cases),
            count(h.total),
            format_number(point.average, 1),
            count(point.cumulative),
        ]);
    }
    table.render()
}

/// Headline figures followed by the top users and the hourly table.
pub fn render_summary(result: &AnalysisResult, top: usize, window: usize) -> String {
    let s = &result.summary;
    let mut out = String::new();

    out.push_str(&format!(
        "Unidades: {}   Caixas: {}   Total: {}\n",
        count(s.totals.units),
        count(s.totals.cases),
        count(s.totals.total)
    ));
    out.push_str(&format!(
        "Usuários: {}   Horas ativas: {}   Média por hora: {}\n",
        s.users,
        s.active_hours,
        format_number(s.average_per_hour, 1)
    ));
    if let Some(peak) = s.peak_hour {
        out.push_str(&format!("Pico: {}\n", format_hour(peak)));
    }
    out.push_str(&format!(
        "Pareto: {} de {} usuários somam 80% do total\n\n",
        s.pareto_cutoff, s.users
    ));

    out.push_str(&render_users(result, Some(top)));
    out.push('\n');
    out.push_str(&render_hours(result, window));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
