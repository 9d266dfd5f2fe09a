//! Formatted terminal output: run summary, totals table, growth table.
//!
//! Kept apart from the aggregation so output changes stay localized.

use crate::domain::{CityResult, ForecastConfig, GrowthTable, SummaryTable};

pub const SUMMARY_TITLE: &str = "=== Summary Table: Total Predicted Crimes (Next 12 Months) ===";
pub const GROWTH_TITLE: &str = "=== Predicted Growth in Crime (Next 12 Months vs Last 12 Months) ===";

const UNAVAILABLE: &str = "n/a";

/// Run header plus the chosen model for each city.
pub fn format_run_summary(results: &[CityResult], config: &ForecastConfig) -> String {
    let mut out = String::new();

    out.push_str("=== crime-forecast - Monthly Crime Forecast by City ===\n");
    out.push_str(&format!(
        "Seed: {} | Series: {} months | Horizon: {} months\n",
        config.seed, config.series_len, config.horizon
    ));
    out.push_str(&format!(
        "Search: {:?} | Criterion: {} | max p={} q={} d={} order={} models={}\n",
        config.search.mode,
        config.search.criterion.display_name(),
        config.search.max_p,
        config.search.max_q,
        config.search.max_d,
        config.search.max_order,
        config.search.max_models,
    ));

    out.push_str("\nModels:\n");
    for r in results {
        match &r.model {
            Some(m) => out.push_str(&format!(
                "  {:<12} {:<32} {}={:.3} sigma2={:.3} ({} fits)\n",
                truncate(r.city(), 12),
                m.label,
                m.criterion.display_name(),
                m.score,
                m.sigma2,
                m.candidates_tried,
            )),
            None => out.push_str(&format!(
                "  {:<12} (skipped) {}\n",
                truncate(r.city(), 12),
                r.summary.note.as_deref().unwrap_or("no model"),
            )),
        }
    }
    out.push('\n');

    out
}

/// Totals table, in the row order given.
pub fn format_summary_table(table: &SummaryTable) -> String {
    let rows: Vec<(String, String)> = table
        .rows
        .iter()
        .map(|r| (r.city.clone(), fmt_opt(r.total, 2)))
        .collect();
    format_two_column(SUMMARY_TITLE, "City", "Total Predicted Crimes", &rows)
}

/// Growth table, in the row order given.
pub fn format_growth_table(table: &GrowthTable) -> String {
    let rows: Vec<(String, String)> = table
        .rows
        .iter()
        .map(|r| (r.city.clone(), fmt_opt(r.growth, 2)))
        .collect();
    format_two_column(GROWTH_TITLE, "City", "Predicted Growth %", &rows)
}

fn format_two_column(title: &str, left: &str, right: &str, rows: &[(String, String)]) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    out.push_str(&format!("{:<16} {:>22}\n", left, right));
    out.push_str(&format!("{:-<16} {:-<22}\n", "", ""));
    for (city, value) in rows {
        out.push_str(&format!("{:<16} {:>22}\n", truncate(city, 16), value));
    }
    out
}

fn fmt_opt(v: Option<f64>, places: usize) -> String {
    match v {
        Some(v) => format!("{v:.places$}"),
        None => UNAVAILABLE.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
