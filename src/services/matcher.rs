//! Best-predecessor search
//!
//! A contract `P` can supply contract `C` when `P` ended no more than
//! `window_days` whole days before `C` starts and `P`'s site is closer to
//! `C`'s site than the depot is. Among eligible candidates the one with the
//! strictly greatest savings wins, so on an exact tie the first candidate in
//! iteration order is kept.

use chrono::{DateTime, Duration, FixedOffset};

use crate::services::geo::planar_distance;
use crate::types::{Contract, ContractLink};

/// Whole days from `earlier` to `later`, rounded toward negative infinity
pub fn whole_days_between(later: DateTime<FixedOffset>, earlier: DateTime<FixedOffset>) -> i64 {
    let delta = later.signed_duration_since(earlier);
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainMatcher {
    window_days: i64,
}

impl ChainMatcher {
    pub fn new(window_days: u32) -> Self {
        Self {
            window_days: i64::from(window_days),
        }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Evaluate `previous` as a source of equipment for `contract`.
    ///
    /// Returns the predecessor link when eligible. A contract is never its
    /// own candidate.
    pub fn candidate(&self, contract: &Contract, previous: &Contract) -> Option<ContractLink> {
        if previous.key == contract.key {
            return None;
        }

        let days_gap = whole_days_between(contract.start_date, previous.end_date);
        if !(0..=self.window_days).contains(&days_gap) {
            return None;
        }

        let site_to_site_km = planar_distance(&previous.location, &contract.location);
        if site_to_site_km >= contract.distance_to_depot_km {
            return None;
        }

        let savings_km = contract.distance_to_depot_km - site_to_site_km;
        Some(ContractLink {
            contract_key: previous.key.clone(),
            site_name: previous.site_name.clone(),
            date: previous.end_day(),
            days_gap,
            site_to_site_km,
            savings_km,
            savings_percentage: savings_km / contract.distance_to_depot_km * 100.0,
        })
    }

    /// Scan `all` for the eligible predecessor with the greatest savings
    pub fn best_predecessor(&self, contract: &Contract, all: &[Contract]) -> Option<ContractLink> {
        let mut best: Option<ContractLink> = None;

        for previous in all {
            let Some(link) = self.candidate(contract, previous) else {
                continue;
            };
            let better = best
                .as_ref()
                .map_or(true, |current| link.savings_km > current.savings_km);
            if better {
                best = Some(link);
            }
        }

        best
    }
}
