//! The record cleaner: raw listings table in, canonical working table out.
//!
//! Pipeline, in order:
//!
//! 1. normalize column names ([`crate::normalize`])
//! 2. drop exact duplicate rows, keeping first occurrence
//! 3. drop the constant `switch_to_order_menu` column
//! 4. drop rows matched by the outlier denylist ([`OutlierRule`])
//! 5. canonicalize `cuisines` to the first comma-separated tag
//! 6. drop rows whose cuisine is unresolvable (`"nan"`)
//! 7. derive `color_name`, `country_name`, `price_type`, `exchange_rate` and
//!    `average_cost_for_two_USD` from the reference tables
//!
//! Cleaning is a pure transform with fail-fast lookups: an unknown color or
//! country code aborts with [`PipelineError::UnknownReferenceKey`] naming the
//! row and key. Re-running [`clean`] on its own output yields an identical
//! table (derived columns are recomputed in place, never duplicated).

use std::collections::HashSet;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::normalize::{columns, normalize_columns};
use crate::observability::{CleaningStats, PipelineObserver, PipelineSeverity};
use crate::reference;
use crate::types::{DataSet, DataType, Field, Value};

/// Cost limit used by the default outlier denylist.
///
/// The source snapshot carries one data-entry error: a `price_range == 1`
/// ("cheap") listing priced at 25 000 017 local units. The original pipeline
/// removed it by its row offset; matching on content keeps the exclusion
/// stable across snapshots.
pub const DEFAULT_CHEAP_COST_LIMIT: f64 = 1_000_000.0;

/// Content-based row exclusion applied before derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutlierRule {
    /// Drop the row with this exact restaurant id.
    RestaurantId(i64),
    /// Drop rows labeled `price_range == 1` whose local cost exceeds the limit.
    CheapCostAbove(f64),
}

/// Options controlling the cleaning pipeline.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct CleaningOptions {
    /// Outlier denylist; rows matching any rule are dropped.
    pub denylist: Vec<OutlierRule>,
    /// Optional observer for stats/failure reporting.
    pub observer: Option<Arc<dyn PipelineObserver>>,
}

impl fmt::Debug for CleaningOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleaningOptions")
            .field("denylist", &self.denylist)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            denylist: vec![OutlierRule::CheapCostAbove(DEFAULT_CHEAP_COST_LIMIT)],
            observer: None,
        }
    }
}

/// Clean a raw listings table with default options.
pub fn clean(raw: &DataSet) -> PipelineResult<DataSet> {
    clean_with_options(raw, &CleaningOptions::default()).map(|(ds, _)| ds)
}

/// Clean a raw listings table, returning the cleaned table and row accounting.
///
/// When an observer is configured, reports `on_cleaned` with the stats on
/// success and `on_failure` on error.
pub fn clean_with_options(
    raw: &DataSet,
    options: &CleaningOptions,
) -> PipelineResult<(DataSet, CleaningStats)> {
    let result = run_pipeline(raw, &options.denylist);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok((_, stats)) => obs.on_cleaned(stats),
            Err(e) => obs.on_failure(PipelineSeverity::Error, e),
        }
    }

    result
}

fn run_pipeline(
    raw: &DataSet,
    denylist: &[OutlierRule],
) -> PipelineResult<(DataSet, CleaningStats)> {
    let rows_in = raw.row_count();
    let ds = normalize_columns(raw)?;

    let ds = dedup_rows(&ds);
    let duplicates_removed = rows_in - ds.row_count();

    let ds = ds.drop_column(columns::SWITCH_TO_ORDER_MENU);

    let before_outliers = ds.row_count();
    let ds = drop_outliers(&ds, denylist)?;
    let outliers_removed = before_outliers - ds.row_count();

    let ds = canonicalize_cuisines(&ds)?;
    let before_nan = ds.row_count();
    let cuisines_idx = ds.require_column(columns::CUISINES)?;
    let ds = ds.filter_rows(|row| row.get(cuisines_idx).and_then(Value::as_str) != Some("nan"));
    let unresolved_cuisines_removed = before_nan - ds.row_count();

    let ds = derive_columns(&ds)?;

    let stats = CleaningStats {
        rows_in,
        duplicates_removed,
        outliers_removed,
        unresolved_cuisines_removed,
        rows_out: ds.row_count(),
    };
    Ok((ds, stats))
}

/// Stable textual key for full-row equality. Floats compare by bit pattern so
/// that a row always deduplicates against an exact copy of itself.
fn row_key(row: &[Value]) -> String {
    let mut key = String::new();
    for value in row {
        match value {
            Value::Null => key.push_str("n;"),
            Value::Int64(v) => {
                let _ = write!(key, "i{v};");
            }
            Value::Float64(v) => {
                let _ = write!(key, "f{:x};", v.to_bits());
            }
            Value::Bool(v) => {
                let _ = write!(key, "b{v};");
            }
            Value::Utf8(s) => {
                let _ = write!(key, "s{};{s}\u{0};", s.len());
            }
        }
    }
    key
}

fn dedup_rows(ds: &DataSet) -> DataSet {
    let mut seen: HashSet<String> = HashSet::with_capacity(ds.row_count());
    ds.filter_rows(|row| seen.insert(row_key(row)))
}

fn drop_outliers(ds: &DataSet, denylist: &[OutlierRule]) -> PipelineResult<DataSet> {
    if denylist.is_empty() {
        return Ok(ds.clone());
    }
    let id_idx = ds.require_column(columns::RESTAURANT_ID)?;
    let range_idx = ds.require_column(columns::PRICE_RANGE)?;
    let cost_idx = ds.require_column(columns::AVERAGE_COST_FOR_TWO)?;

    Ok(ds.filter_rows(|row| {
        !denylist
            .iter()
            .any(|rule| matches_outlier(rule, row, id_idx, range_idx, cost_idx))
    }))
}

fn matches_outlier(
    rule: &OutlierRule,
    row: &[Value],
    id_idx: usize,
    range_idx: usize,
    cost_idx: usize,
) -> bool {
    match rule {
        OutlierRule::RestaurantId(id) => row.get(id_idx).and_then(Value::as_i64) == Some(*id),
        OutlierRule::CheapCostAbove(limit) => {
            row.get(range_idx).and_then(Value::as_i64) == Some(1)
                && row
                    .get(cost_idx)
                    .and_then(Value::as_f64)
                    .is_some_and(|cost| cost > *limit)
        }
    }
}

/// Coerce a raw cuisines cell to its single canonical tag.
///
/// Missing values become the literal string `"nan"` (dropped by the next
/// step); non-string garbage is formatted to text first. Strings keep only
/// the first comma-separated token, trimmed.
fn canonical_cuisine(value: &Value) -> String {
    let text = match value {
        Value::Null => return "nan".to_string(),
        Value::Utf8(s) => s.clone(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
    };
    text.split(',').next().unwrap_or("").trim().to_string()
}

fn canonicalize_cuisines(ds: &DataSet) -> PipelineResult<DataSet> {
    let idx = ds.require_column(columns::CUISINES)?;
    let rows = ds
        .rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            if let Some(value) = out.get_mut(idx) {
                *value = Value::Utf8(canonical_cuisine(value));
            }
            out
        })
        .collect();
    Ok(DataSet::new(ds.schema.clone(), rows))
}

/// Append (or recompute in place) the five derived columns.
fn derive_columns(ds: &DataSet) -> PipelineResult<DataSet> {
    let color_idx = ds.require_column(columns::RATING_COLOR)?;
    let country_idx = ds.require_column(columns::COUNTRY_CODE)?;
    let range_idx = ds.require_column(columns::PRICE_RANGE)?;
    let cost_idx = ds.require_column(columns::AVERAGE_COST_FOR_TWO)?;

    let mut schema = ds.schema.clone();
    let derived = [
        (columns::COLOR_NAME, DataType::Utf8),
        (columns::COUNTRY_NAME, DataType::Utf8),
        (columns::PRICE_TYPE, DataType::Utf8),
        (columns::EXCHANGE_RATE, DataType::Float64),
        (columns::AVERAGE_COST_FOR_TWO_USD, DataType::Float64),
    ];
    let mut positions = Vec::with_capacity(derived.len());
    for (name, data_type) in derived {
        match schema.index_of(name) {
            Some(idx) => positions.push(idx),
            None => {
                schema.fields.push(Field::new(name, data_type));
                positions.push(schema.fields.len() - 1);
            }
        }
    }
    let width = schema.fields.len();

    let mut rows = Vec::with_capacity(ds.row_count());
    for (row_idx, row) in ds.rows.iter().enumerate() {
        let color_code = row.get(color_idx).and_then(Value::as_str).unwrap_or("");
        let color = reference::color_name(color_code).ok_or_else(|| {
            PipelineError::UnknownReferenceKey {
                row: row_idx,
                table: "color",
                key: color_code.to_string(),
            }
        })?;

        let country_code = row.get(country_idx).and_then(Value::as_i64);
        let country = country_code
            .and_then(reference::country_name)
            .ok_or_else(|| PipelineError::UnknownReferenceKey {
                row: row_idx,
                table: "country",
                key: country_code.map_or_else(|| "null".to_string(), |c| c.to_string()),
            })?;

        // Every COUNTRY entry has a rate, so this can only miss if the
        // exchange snapshot falls out of sync with the country table.
        let rate = reference::exchange_rate_to_usd(country).ok_or_else(|| {
            PipelineError::UnknownReferenceKey {
                row: row_idx,
                table: "exchange_rate",
                key: country.to_string(),
            }
        })?;

        let tier = row
            .get(range_idx)
            .and_then(Value::as_i64)
            .map_or(reference::PriceTier::Gourmet, reference::price_tier);

        let cost_usd = match row.get(cost_idx).and_then(Value::as_f64) {
            Some(cost) => Value::Float64(cost * rate),
            None => Value::Null,
        };

        let mut out = row.clone();
        out.resize(width, Value::Null);
        out[positions[0]] = Value::Utf8(color.to_string());
        out[positions[1]] = Value::Utf8(country.to_string());
        out[positions[2]] = Value::Utf8(tier.label().to_string());
        out[positions[3]] = Value::Float64(rate);
        out[positions[4]] = cost_usd;
        rows.push(out);
    }

    Ok(DataSet::new(schema, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_key_distinguishes_types_and_bit_patterns() {
        assert_ne!(
            row_key(&[Value::Int64(1)]),
            row_key(&[Value::Utf8("1".to_string())])
        );
        assert_ne!(row_key(&[Value::Float64(0.0)]), row_key(&[Value::Float64(-0.0)]));
        assert_eq!(
            row_key(&[Value::Float64(1.5), Value::Null]),
            row_key(&[Value::Float64(1.5), Value::Null])
        );
    }

    #[test]
    fn canonical_cuisine_takes_first_tag() {
        assert_eq!(canonical_cuisine(&Value::Utf8("Chinese, Thai".to_string())), "Chinese");
        assert_eq!(canonical_cuisine(&Value::Utf8("Italian".to_string())), "Italian");
        assert_eq!(canonical_cuisine(&Value::Null), "nan");
        assert_eq!(canonical_cuisine(&Value::Int64(42)), "42");
    }

    #[test]
    fn outlier_rules_match_on_content() {
        let row = vec![Value::Int64(356), Value::Int64(1), Value::Float64(25_000_017.0)];
        assert!(matches_outlier(&OutlierRule::RestaurantId(356), &row, 0, 1, 2));
        assert!(!matches_outlier(&OutlierRule::RestaurantId(357), &row, 0, 1, 2));
        assert!(matches_outlier(
            &OutlierRule::CheapCostAbove(DEFAULT_CHEAP_COST_LIMIT),
            &row,
            0,
            1,
            2
        ));

        // A gourmet row with the same cost is not a "cheap" outlier.
        let gourmet = vec![Value::Int64(1), Value::Int64(4), Value::Float64(25_000_017.0)];
        assert!(!matches_outlier(
            &OutlierRule::CheapCostAbove(DEFAULT_CHEAP_COST_LIMIT),
            &gourmet,
            0,
            1,
            2
        ));
    }

    #[test]
    fn default_options_carry_the_cheap_cost_rule() {
        let opts = CleaningOptions::default();
        assert_eq!(
            opts.denylist,
            vec![OutlierRule::CheapCostAbove(DEFAULT_CHEAP_COST_LIMIT)]
        );
        assert!(opts.observer.is_none());
    }
}
