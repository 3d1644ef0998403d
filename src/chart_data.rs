//! Reshape payload records into the row tables the charts and tables render.

use chrono::{DateTime, Utc};

use crate::payload::{ConfirmedRecord, Payload, PosNegRecord};

/// One timestamped multi-value observation. Values may be NaN for missing
/// data; the chart widgets guard for that.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub date: DateTime<Utc>,
    pub values: Vec<f64>,
}

impl Row {
    pub fn new(date: DateTime<Utc>, values: Vec<f64>) -> Self {
        Self { date, values }
    }
}

/// A row table plus its ordered column labels. The first label names the
/// time axis; the rest align positionally with `Row::values`.
#[derive(Debug, Clone)]
pub struct RowTable {
    pub schema: Vec<String>,
    /// Short labels for the detail box, when the full ones are too wide.
    pub short_schema: Option<Vec<String>>,
    pub rows: Vec<Row>,
}

impl RowTable {
    fn new(schema: &[&str], mut rows: Vec<Row>) -> Self {
        // Charts and the placement heuristic assume time order. Duplicate
        // timestamps are kept as-is.
        rows.sort_by_key(|row| row.date);
        Self {
            schema: schema.iter().map(|s| s.to_string()).collect(),
            short_schema: None,
            rows,
        }
    }

    fn with_short_schema(mut self, short: &[&str]) -> Self {
        self.short_schema = Some(short.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Labels to use in the detail box.
    pub fn detail_schema(&self) -> &[String] {
        self.short_schema.as_deref().unwrap_or(&self.schema)
    }

    /// Number of value series per row.
    pub fn series_count(&self) -> usize {
        self.schema.len().saturating_sub(1)
    }
}

/// Confirmed cases: total and new positives per day.
pub fn confirmed_table(records: &[ConfirmedRecord]) -> RowTable {
    let rows = records
        .iter()
        .filter_map(|r| {
            crate::payload::parse_date(&r.date)
                .map(|date| Row::new(date, vec![r.total_positive, r.new_positive]))
        })
        .collect();
    RowTable::new(&["Date", "Total", "New"], rows)
}

/// Cumulative positive/negative test counts per day.
pub fn total_pos_neg_table(records: &[PosNegRecord]) -> RowTable {
    RowTable::new(
        &["Date", "Total Positive", "Total Negative"],
        pos_neg_rows(records),
    )
}

/// Per-day positive/negative test counts.
pub fn daily_pos_neg_table(records: &[PosNegRecord]) -> RowTable {
    RowTable::new(&["Date", "Positive", "Negative"], pos_neg_rows(records))
}

/// Share of positive tests per day: positive / (positive + negative).
/// A zero denominator yields NaN, which flows through the charts' missing
/// data handling.
pub fn positive_rate_table(records: &[PosNegRecord]) -> RowTable {
    let rows = records
        .iter()
        .filter_map(|r| {
            crate::payload::parse_date(&r.date)
                .map(|date| Row::new(date, vec![r.positive / (r.positive + r.negative)]))
        })
        .collect();
    RowTable::new(&["Date", "Total Positive Rate"], rows)
        .with_short_schema(&["Date", "Positive Rate"])
}

fn pos_neg_rows(records: &[PosNegRecord]) -> Vec<Row> {
    records
        .iter()
        .filter_map(|r| {
            crate::payload::parse_date(&r.date)
                .map(|date| Row::new(date, vec![r.positive, r.negative]))
        })
        .collect()
}

/// Bottom-up stacked running totals for one row: element i is the sum of
/// values[0..=i]. Non-finite values contribute zero so a single missing
/// series cannot poison the rest of the stack.
pub fn running_totals(values: &[f64]) -> Vec<f64> {
    let mut sum = 0.0;
    values
        .iter()
        .map(|&v| {
            if v.is_finite() {
                sum += v;
            }
            sum
        })
        .collect()
}

/// The payload reshaped into everything the page renders.
pub struct PageData {
    pub page_type: String,
    pub is_us: bool,
    pub confirmed: RowTable,
    pub total_pos_neg: RowTable,
    pub daily_pos_neg: RowTable,
    pub positive_rate: RowTable,
    pub most_recently: Vec<crate::payload::SummaryRecord>,
    pub state_most_recent: Option<Vec<crate::payload::RecordAndDiff>>,
}

impl PageData {
    pub fn from_payload(payload: Payload) -> Self {
        Self {
            is_us: payload.is_us(),
            confirmed: confirmed_table(&payload.confirmed),
            total_pos_neg: total_pos_neg_table(&payload.total_pos_neg),
            daily_pos_neg: daily_pos_neg_table(&payload.daily_pos_neg),
            positive_rate: positive_rate_table(&payload.total_pos_neg),
            most_recently: payload.most_recently,
            state_most_recent: payload.state_most_recent,
            page_type: payload.page_type,
        }
    }
}
