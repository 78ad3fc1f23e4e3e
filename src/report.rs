/// Classified alert feed: rows, filtering, pagination, CSV export.
///
/// `build_rows` runs each validated reading once through the severity
/// classifier and keeps the store's most-recent-first order. The filter
/// treats severity as an opaque three-valued tag and the description as a
/// case-insensitive substring-matchable string — the same contract the
/// dashboard applies client-side.

use serde::Serialize;

use crate::alert::severity::{self, SeverityThresholds};
use crate::model::{HydrologicalReading, SeverityLevel};

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One row of the alert feed, derived per reading on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    pub id: i64,
    pub ts: String,
    #[serde(rename = "severidad")]
    pub severity: SeverityLevel,
    #[serde(rename = "descripcion")]
    pub description: String,
    pub nivel_m: f64,
    pub lluvia_mm: f64,
}

/// Classifies and describes each reading, preserving input order.
pub fn build_rows(readings: &[HydrologicalReading], thresholds: &SeverityThresholds) -> Vec<AlertRow> {
    readings
        .iter()
        .map(|reading| AlertRow {
            id: reading.id,
            ts: reading.timestamp.clone(),
            severity: severity::classify(reading, thresholds),
            description: severity::describe(reading, thresholds),
            nivel_m: reading.level_m,
            lluvia_mm: reading.rain_mm,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Filtering and pagination
// ---------------------------------------------------------------------------

/// Search and severity filter over already-classified rows.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    /// Case-insensitive substring matched against the description.
    pub search: Option<String>,
    /// Exact severity tag; `None` means all severities.
    pub severity: Option<SeverityLevel>,
}

impl AlertFilter {
    pub fn matches(&self, row: &AlertRow) -> bool {
        if let Some(term) = &self.search {
            if !row
                .description
                .to_lowercase()
                .contains(&term.to_lowercase())
            {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if row.severity != severity {
                return false;
            }
        }
        true
    }
}

/// Applies the filter, keeping order.
pub fn filter_rows(rows: &[AlertRow], filter: &AlertFilter) -> Vec<AlertRow> {
    rows.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// Returns the 1-based `page` of `per_page` rows, matching the dashboard's
/// pagination. Out-of-range pages yield an empty slice.
pub fn paginate(rows: &[AlertRow], page: usize, per_page: usize) -> &[AlertRow] {
    if per_page == 0 || page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= rows.len() {
        return &[];
    }
    let end = (start + per_page).min(rows.len());
    &rows[start..end]
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Renders the feed as CSV with the dashboard's export columns.
pub fn to_csv(rows: &[AlertRow]) -> String {
    let mut out = String::from("id,ts,severidad,descripcion,nivel_m,lluvia_mm\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{:.2},{:.2}\n",
            row.id,
            csv_field(&row.ts),
            row.severity.as_tag(),
            csv_field(&row.description),
            row.nivel_m,
            row.lluvia_mm
        ));
    }
    out
}

/// Quotes a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
