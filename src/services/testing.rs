//! Fixtures shared by service tests

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

use crate::services::geo::planar_distance;
use crate::types::{Contract, Coordinates};

/// Midnight UTC, `n` days after 2023-01-01
pub fn day(n: i64) -> DateTime<FixedOffset> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid base date");
    Utc.fix().from_utc_datetime(&base) + Duration::days(n)
}

pub fn contract(
    key: &str,
    (lat, lng): (f64, f64),
    start_day: i64,
    end_day: i64,
    depot: Coordinates,
) -> Contract {
    let location = Coordinates::new(lat, lng);
    Contract {
        key: key.to_string(),
        site_name: format!("{key} site"),
        location,
        start_date: day(start_day),
        end_date: day(end_day),
        distance_to_depot_km: planar_distance(&location, &depot),
    }
}
