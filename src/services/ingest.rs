//! Contract ingestion
//!
//! Turns raw dataset records into [`Contract`]s. A record that lacks usable
//! coordinates or dates is rejected with an [`IngestError`] and counted; it
//! never reaches matching. Nothing here aborts the batch.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::services::geo::planar_distance;
use crate::types::{Contract, Coordinates, RawContract};

/// Why a record was left out of the working set
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("missing field {field}")]
    MissingField { field: &'static str },

    #[error("unparseable date in {field}: {value:?}")]
    UnparseableDate { field: &'static str, value: String },

    #[error("non-numeric coordinate in {field}: {value}")]
    NonNumericCoordinate { field: &'static str, value: String },

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

impl IngestError {
    pub const fn kind(&self) -> &'static str {
        match self {
            IngestError::MissingField { .. } => "missing_field",
            IngestError::UnparseableDate { .. } => "unparseable_date",
            IngestError::NonNumericCoordinate { .. } => "non_numeric_coordinate",
            IngestError::MalformedRecord(_) => "malformed_record",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub key: String,
    pub error: IngestError,
}

/// Result of one ingestion pass
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Accepted contracts, sorted by start date ascending (stable)
    pub contracts: Vec<Contract>,
    pub rejected: Vec<RejectedRecord>,
}

impl IngestReport {
    pub fn rejected_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.rejected {
            *counts.entry(record.error.kind()).or_insert(0) += 1;
        }
        counts
    }
}

/// Normalizes raw records against a fixed depot location
#[derive(Debug, Clone, Copy)]
pub struct ContractIndex {
    depot: Coordinates,
}

impl ContractIndex {
    pub fn new(depot: Coordinates) -> Self {
        Self { depot }
    }

    pub fn depot(&self) -> Coordinates {
        self.depot
    }

    /// Ingest a key -> record mapping, in the mapping's iteration order.
    ///
    /// The output is sorted by start date; records sharing a start date keep
    /// their input order, which later decides tie-breaks.
    pub fn ingest(&self, records: &Map<String, Value>) -> IngestReport {
        let mut report = IngestReport::default();

        for (key, value) in records {
            match self.parse_record(key, value) {
                Ok(contract) => report.contracts.push(contract),
                Err(error) => {
                    match &error {
                        IngestError::MissingField { .. } => {
                            debug!("Contract {} excluded: {}", key, error);
                        }
                        _ => warn!("Contract {} excluded: {}", key, error),
                    }
                    report.rejected.push(RejectedRecord {
                        key: key.clone(),
                        error,
                    });
                }
            }
        }

        report.contracts.sort_by_key(|c| c.start_date);

        info!(
            "Ingested {} contracts ({} excluded)",
            report.contracts.len(),
            report.rejected.len()
        );
        report
    }

    /// Parse a single raw record into a contract
    pub fn parse_record(&self, key: &str, value: &Value) -> Result<Contract, IngestError> {
        let raw = RawContract::deserialize(value)
            .map_err(|e| IngestError::MalformedRecord(e.to_string()))?;

        let site = raw.site_address.as_ref();
        let lat_raw = site
            .and_then(|s| present(s.latitude.as_ref()))
            .ok_or(IngestError::MissingField { field: "latitude" })?;
        let lng_raw = site
            .and_then(|s| present(s.longitude.as_ref()))
            .ok_or(IngestError::MissingField { field: "longitude" })?;
        let start_raw = raw
            .start_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(IngestError::MissingField { field: "startDate" })?;
        let (end_field, end_raw) = raw.end_date_field();
        let end_raw = end_raw.ok_or(IngestError::MissingField { field: end_field })?;

        let location = Coordinates::new(
            parse_coordinate("latitude", lat_raw)?,
            parse_coordinate("longitude", lng_raw)?,
        );
        let start_date = parse_timestamp("startDate", start_raw)?;
        let end_date = parse_timestamp(end_field, end_raw)?;

        Ok(Contract {
            key: key.to_string(),
            site_name: site.and_then(|s| s.name.clone()).unwrap_or_default(),
            location,
            start_date,
            end_date,
            distance_to_depot_km: planar_distance(&location, &self.depot),
        })
    }
}

/// `null` and blank strings count as absent
fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

fn parse_coordinate(field: &'static str, value: &Value) -> Result<f64, IngestError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| IngestError::NonNumericCoordinate {
            field,
            value: value.to_string(),
        })
}

/// Parse an ISO-8601 timestamp.
///
/// A trailing `Z` is rewritten to `+00:00` first. Timestamps without an
/// offset, and bare dates, are taken as UTC.
pub fn parse_timestamp(
    field: &'static str,
    raw: &str,
) -> Result<DateTime<FixedOffset>, IngestError> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(stem) => format!("{stem}+00:00"),
        None => trimmed.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Ok(dt);
        }
    }

    let utc = Utc.fix();
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(utc.from_utc_datetime(&naive));
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(utc.from_utc_datetime(&naive));
    }

    Err(IngestError::UnparseableDate {
        field,
        value: raw.to_string(),
    })
}
