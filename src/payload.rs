//! Payload boundary: decode the embedded JSON blob into typed records.
//!
//! The page generator ships the data as a base64-encoded JSON object. A raw
//! JSON file is accepted too (handy for fixtures); detection simply tries
//! JSON first and falls back to base64.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, NaiveDateTime, Utc};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::Deserialize;
use std::path::Path;

/// Exact timestamp pattern used by every date field in the payload.
pub const DATE_PATTERN: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a payload timestamp. Malformed strings yield `None`; callers drop
/// the record so invalid dates never reach the scale builder.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, DATE_PATTERN)
        .ok()
        .map(|naive| naive.and_utc())
}

/// One day of confirmed-case counts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedRecord {
    pub date: String,
    #[serde(default)]
    pub total_positive: f64,
    #[serde(default)]
    pub new_positive: f64,
}

/// One day of positive/negative test counts (used for both the cumulative
/// and the per-day series).
#[derive(Debug, Clone, Deserialize)]
pub struct PosNegRecord {
    pub date: String,
    #[serde(default)]
    pub positive: f64,
    #[serde(default)]
    pub negative: f64,
}

/// A most-recent snapshot for a region. All fields are optional in the wire
/// format and default to zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub positive: f64,
    #[serde(default)]
    pub negative: f64,
    #[serde(default)]
    pub pending: f64,
    #[serde(default)]
    pub death: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub pos_neg: f64,
}

/// A snapshot paired with its day-over-day difference.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordAndDiff {
    pub record: SummaryRecord,
    pub diff: SummaryRecord,
}

/// The decoded page payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// "US" or a state code; compared case-insensitively for the breadcrumb.
    pub page_type: String,
    #[serde(default)]
    pub confirmed: Vec<ConfirmedRecord>,
    #[serde(default)]
    pub total_pos_neg: Vec<PosNegRecord>,
    #[serde(default)]
    pub daily_pos_neg: Vec<PosNegRecord>,
    /// At least two records (current, previous) when present.
    #[serde(default)]
    pub most_recently: Vec<SummaryRecord>,
    /// Per-state breakdown; only present on the national page.
    #[serde(default)]
    pub state_most_recent: Option<Vec<RecordAndDiff>>,
}

impl Payload {
    /// Decode a payload from text: raw JSON, or a base64-encoded JSON blob.
    pub fn from_str(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        match serde_json::from_str::<Self>(trimmed) {
            Ok(payload) => Ok(payload),
            Err(json_err) => {
                let stripped: String = trimmed.split_whitespace().collect();
                let bytes = BASE64.decode(stripped.as_bytes()).map_err(|b64_err| {
                    eyre!(
                        "payload is neither JSON ({}) nor base64-encoded JSON ({})",
                        json_err,
                        b64_err
                    )
                })?;
                serde_json::from_slice(&bytes)
                    .map_err(|e| eyre!("decoded base64 payload is not valid JSON: {}", e))
            }
        }
    }

    /// Read and decode a payload file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| eyre!("could not read payload {}: {}", path.display(), e))?;
        Self::from_str(&text)
    }

    /// Whether this is the national page (vs. a single state).
    pub fn is_us(&self) -> bool {
        self.page_type.eq_ignore_ascii_case("us")
    }
}
