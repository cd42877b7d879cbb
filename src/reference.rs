//! Fixed reference tables used to enrich listing rows.
//!
//! All four lookups are frozen at build time: rating-color codes, country
//! codes, the USD exchange-rate snapshot and the price-tier mapping. Color
//! and country misses surface from cleaning as
//! [`crate::error::PipelineError::UnknownReferenceKey`]; the price-tier
//! mapping is total by design (unknown ranges fall through to gourmet).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Human-readable name for a rating-color hex code.
pub fn color_name(code: &str) -> Option<&'static str> {
    match code {
        "3F7E00" => Some("darkgreen"),
        "5BA829" => Some("green"),
        "9ACD32" => Some("lightgreen"),
        "CDD614" => Some("orange"),
        "FFBA00" => Some("red"),
        "CBCBC8" => Some("darkred"),
        "FF7800" => Some("darkred"),
        _ => None,
    }
}

/// Country name for a numeric country code.
pub fn country_name(code: i64) -> Option<&'static str> {
    match code {
        1 => Some("India"),
        14 => Some("Australia"),
        30 => Some("Brazil"),
        37 => Some("Canada"),
        94 => Some("Indonesia"),
        148 => Some("New Zealand"),
        162 => Some("Philippines"),
        166 => Some("Qatar"),
        184 => Some("Singapore"),
        189 => Some("South Africa"),
        191 => Some("Sri Lanka"),
        208 => Some("Turkey"),
        214 => Some("United Arab Emirates"),
        215 => Some("England"),
        216 => Some("United States of America"),
        _ => None,
    }
}

/// Local-currency to USD multiplier per country. Snapshot of 2023-08-13.
pub fn exchange_rate_to_usd(country: &str) -> Option<f64> {
    match country {
        "Indonesia" => Some(0.000065735428),
        "Sri Lanka" => Some(0.0031340417),
        "Philippines" => Some(0.073999949),
        "India" => Some(0.012060175),
        "South Africa" => Some(0.052876995),
        "Qatar" => Some(0.27472527),
        "United Arab Emirates" => Some(0.27229408),
        "Singapore" => Some(0.73957914),
        "Brazil" => Some(0.20388112),
        "Turkey" => Some(0.037143494),
        "Australia" => Some(0.65059812),
        "New Zealand" => Some(0.59840393),
        "United States of America" => Some(1.0),
        "England" => Some(1.2695533),
        "Canada" => Some(0.7441021),
        _ => None,
    }
}

/// Categorical price label derived from the numeric price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Cheap,
    Normal,
    Expensive,
    Gourmet,
}

impl PriceTier {
    /// Stable lowercase label, as stored in the cleaned table's `price_type`
    /// column.
    pub fn label(self) -> &'static str {
        match self {
            PriceTier::Cheap => "cheap",
            PriceTier::Normal => "normal",
            PriceTier::Expensive => "expensive",
            PriceTier::Gourmet => "gourmet",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Price tier for a numeric price range. Total: anything outside 1..=3 is
/// gourmet.
pub fn price_tier(price_range: i64) -> PriceTier {
    match price_range {
        1 => PriceTier::Cheap,
        2 => PriceTier::Normal,
        3 => PriceTier::Expensive,
        _ => PriceTier::Gourmet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_lookup() {
        assert_eq!(color_name("3F7E00"), Some("darkgreen"));
        // Two codes share the darkred name in the source data.
        assert_eq!(color_name("CBCBC8"), Some("darkred"));
        assert_eq!(color_name("FF7800"), Some("darkred"));
        assert_eq!(color_name("000000"), None);
    }

    #[test]
    fn country_lookup() {
        assert_eq!(country_name(1), Some("India"));
        assert_eq!(country_name(216), Some("United States of America"));
        assert_eq!(country_name(2), None);
    }

    #[test]
    fn every_country_has_an_exchange_rate() {
        for code in [1, 14, 30, 37, 94, 148, 162, 166, 184, 189, 191, 208, 214, 215, 216] {
            let name = country_name(code).unwrap();
            assert!(exchange_rate_to_usd(name).is_some(), "no rate for {name}");
        }
        assert_eq!(exchange_rate_to_usd("United States of America"), Some(1.0));
        assert_eq!(exchange_rate_to_usd("Atlantis"), None);
    }

    #[test]
    fn price_tier_is_total() {
        assert_eq!(price_tier(1), PriceTier::Cheap);
        assert_eq!(price_tier(2), PriceTier::Normal);
        assert_eq!(price_tier(3), PriceTier::Expensive);
        assert_eq!(price_tier(4), PriceTier::Gourmet);
        assert_eq!(price_tier(5), PriceTier::Gourmet);
        assert_eq!(price_tier(0), PriceTier::Gourmet);
        assert_eq!(price_tier(-1), PriceTier::Gourmet);
    }

    #[test]
    fn price_tier_serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&PriceTier::Gourmet).unwrap();
        assert_eq!(json, "\"gourmet\"");
        let tier: PriceTier = serde_json::from_str("\"cheap\"").unwrap();
        assert_eq!(tier, PriceTier::Cheap);
    }
}
