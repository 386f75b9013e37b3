//! Contract types

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A normalized hire contract, ready for matching.
///
/// Built only by ingestion; every field is validated there and the struct is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    pub key: String,
    pub site_name: String,
    pub location: Coordinates,
    pub start_date: DateTime<FixedOffset>,
    /// Actual end date when known, planned end date otherwise.
    pub end_date: DateTime<FixedOffset>,
    /// Straight-line distance from the depot, computed once at ingestion.
    pub distance_to_depot_km: f64,
}

impl Contract {
    /// Calendar date the contract starts, in its own offset.
    pub fn start_day(&self) -> NaiveDate {
        self.start_date.date_naive()
    }

    /// Calendar date the contract ends, in its own offset.
    pub fn end_day(&self) -> NaiveDate {
        self.end_date.date_naive()
    }
}

/// One redeployment relation between two contracts, seen from one side.
///
/// On a predecessor link the counterpart is the contract the equipment comes
/// from and `date` is its end date. On a successor link the counterpart is the
/// contract the equipment goes to and `date` is its start date. Distances are
/// kept unrounded; rounding happens only when records are written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractLink {
    pub contract_key: String,
    pub site_name: String,
    pub date: NaiveDate,
    pub days_gap: i64,
    pub site_to_site_km: f64,
    pub savings_km: f64,
    pub savings_percentage: f64,
}

/// Raw site object as found in the source dataset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSite {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<serde_json::Value>,
    #[serde(default)]
    pub longitude: Option<serde_json::Value>,
}

/// Raw contract record as found in the source dataset.
///
/// Only the fields the engine reads are modelled; everything else in the
/// record is left to the reporting side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContract {
    #[serde(default, alias = "site")]
    pub site_address: Option<RawSite>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub actual_end_date: Option<String>,
    #[serde(default)]
    pub planned_end_date: Option<String>,
}

impl RawContract {
    /// The end date field to use: actual if present and non-empty, else planned.
    pub fn end_date_field(&self) -> (&'static str, Option<&str>) {
        match self.actual_end_date.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(actual) => ("actualEndDate", Some(actual)),
            None => (
                "plannedEndDate",
                self.planned_end_date.as_deref().filter(|s| !s.trim().is_empty()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_contract_deserializes_camel_case() {
        let raw: RawContract = serde_json::from_value(serde_json::json!({
            "siteAddress": { "name": "Hume Fwy", "latitude": "-37.5", "longitude": 145.1 },
            "startDate": "2023-03-01T00:00:00Z",
            "plannedEndDate": "2023-03-10T00:00:00Z",
            "hireType": "VMS"
        }))
        .unwrap();

        let site = raw.site_address.as_ref().unwrap();
        assert_eq!(site.name.as_deref(), Some("Hume Fwy"));
        assert_eq!(raw.start_date.as_deref(), Some("2023-03-01T00:00:00Z"));
        assert!(raw.actual_end_date.is_none());
    }

    #[test]
    fn test_site_alias() {
        let raw: RawContract = serde_json::from_value(serde_json::json!({
            "site": { "latitude": 1.0, "longitude": 2.0 }
        }))
        .unwrap();
        assert!(raw.site_address.is_some());
    }

    #[test]
    fn test_end_date_prefers_actual() {
        let raw = RawContract {
            actual_end_date: Some("2023-01-02".into()),
            planned_end_date: Some("2023-01-05".into()),
            ..Default::default()
        };
        assert_eq!(raw.end_date_field(), ("actualEndDate", Some("2023-01-02")));
    }

    #[test]
    fn test_end_date_empty_actual_falls_back_to_planned() {
        let raw = RawContract {
            actual_end_date: Some(String::new()),
            planned_end_date: Some("2023-01-05".into()),
            ..Default::default()
        };
        assert_eq!(raw.end_date_field(), ("plannedEndDate", Some("2023-01-05")));
    }
}
