//! The filter engine: conjunction of optional per-request criteria over the
//! cleaned table.
//!
//! Every dimension is an independent per-row predicate, so application order
//! does not matter, and the input table is never mutated.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::PipelineResult;
use crate::normalize::columns;
use crate::reference::PriceTier;
use crate::types::{DataSet, Value};

/// Yes/no selection for a boolean-like flag dimension.
///
/// The cleaned table encodes all three flags uniformly as 1 = yes, 0 = no.
/// (The source system inverted the encoding for table booking only; that
/// inconsistency is not reproduced here.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Flag value this selection matches in the cleaned table.
    pub fn flag(self) -> i64 {
        match self {
            YesNo::Yes => 1,
            YesNo::No => 0,
        }
    }
}

/// One display request's filter configuration.
///
/// Empty sets mean "no filtering on this dimension". For the flag dimensions,
/// selecting both yes and no is also a pass-through. All active dimensions
/// compose by logical AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Keep rows whose `country_name` is in this set.
    pub countries: BTreeSet<String>,
    /// Keep rows whose `price_type` is in this set.
    pub price_tiers: BTreeSet<PriceTier>,
    /// Keep rows whose `has_table_booking` flag matches.
    pub table_booking: BTreeSet<YesNo>,
    /// Keep rows whose `is_delivering_now` flag matches.
    pub delivering_now: BTreeSet<YesNo>,
    /// Keep rows whose `has_online_delivery` flag matches.
    pub online_delivery: BTreeSet<YesNo>,
}

impl FilterCriteria {
    /// True if no dimension would remove any row.
    pub fn is_pass_through(&self) -> bool {
        self.countries.is_empty()
            && self.price_tiers.is_empty()
            && flag_target(&self.table_booking).is_none()
            && flag_target(&self.delivering_now).is_none()
            && flag_target(&self.online_delivery).is_none()
    }
}

/// The flag value an active flag dimension selects, or `None` for
/// pass-through (empty set, or both yes and no selected).
fn flag_target(selection: &BTreeSet<YesNo>) -> Option<i64> {
    if selection.len() == 1 {
        selection.iter().next().map(|yn| yn.flag())
    } else {
        None
    }
}

/// Apply `criteria` to a cleaned table, returning a new filtered table.
pub fn apply_filters(ds: &DataSet, criteria: &FilterCriteria) -> PipelineResult<DataSet> {
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let tier_idx = ds.require_column(columns::PRICE_TYPE)?;
    let booking_idx = ds.require_column(columns::HAS_TABLE_BOOKING)?;
    let delivering_idx = ds.require_column(columns::IS_DELIVERING_NOW)?;
    let online_idx = ds.require_column(columns::HAS_ONLINE_DELIVERY)?;

    let booking = flag_target(&criteria.table_booking);
    let delivering = flag_target(&criteria.delivering_now);
    let online = flag_target(&criteria.online_delivery);

    Ok(ds.filter_rows(|row| {
        if !criteria.countries.is_empty() {
            let matches = row
                .get(country_idx)
                .and_then(Value::as_str)
                .is_some_and(|c| criteria.countries.contains(c));
            if !matches {
                return false;
            }
        }

        if !criteria.price_tiers.is_empty() {
            let matches = row.get(tier_idx).and_then(Value::as_str).is_some_and(|label| {
                criteria.price_tiers.iter().any(|tier| tier.label() == label)
            });
            if !matches {
                return false;
            }
        }

        for (target, idx) in [
            (booking, booking_idx),
            (delivering, delivering_idx),
            (online, online_idx),
        ] {
            if let Some(flag) = target {
                if row.get(idx).and_then(Value::as_i64) != Some(flag) {
                    return false;
                }
            }
        }

        true
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_target_semantics() {
        assert_eq!(flag_target(&BTreeSet::new()), None);
        assert_eq!(flag_target(&BTreeSet::from([YesNo::Yes, YesNo::No])), None);
        assert_eq!(flag_target(&BTreeSet::from([YesNo::Yes])), Some(1));
        assert_eq!(flag_target(&BTreeSet::from([YesNo::No])), Some(0));
    }

    #[test]
    fn default_criteria_pass_through() {
        assert!(FilterCriteria::default().is_pass_through());

        let both = FilterCriteria {
            table_booking: BTreeSet::from([YesNo::Yes, YesNo::No]),
            ..Default::default()
        };
        assert!(both.is_pass_through());

        let active = FilterCriteria {
            countries: BTreeSet::from(["India".to_string()]),
            ..Default::default()
        };
        assert!(!active.is_pass_through());
    }

    #[test]
    fn criteria_round_trips_through_json() {
        let json = r#"{
            "countries": ["India", "Qatar"],
            "price_tiers": ["cheap", "gourmet"],
            "table_booking": ["yes"]
        }"#;
        let criteria: FilterCriteria = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.countries.len(), 2);
        assert!(criteria.price_tiers.contains(&PriceTier::Gourmet));
        assert_eq!(flag_target(&criteria.table_booking), Some(1));
        // Omitted dimensions default to pass-through.
        assert!(criteria.delivering_now.is_empty());

        let back: FilterCriteria =
            serde_json::from_str(&serde_json::to_string(&criteria).unwrap()).unwrap();
        assert_eq!(back, criteria);
    }
}
