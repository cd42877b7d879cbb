//! Per-country rankings, grouped on `country_name`.
//!
//! These back the country-level charts, so each returns the full ranking
//! (no N): result tables sorted descending on the metric, ties broken by
//! country name ascending.

use std::collections::{HashMap, HashSet};

use super::{round2, single_key_table, sort_ranked, str_cell, SortOrder};
use crate::error::PipelineResult;
use crate::normalize::columns;
use crate::types::{DataSet, DataType, Value};

/// Distinct cities per country: `[country_name, city_count]`.
pub fn cities_per_country(ds: &DataSet) -> PipelineResult<DataSet> {
    distinct_per_country(ds, columns::CITY, "city_count")
}

/// Distinct cuisine tags per country: `[country_name, cuisine_count]`.
pub fn cuisines_per_country(ds: &DataSet) -> PipelineResult<DataSet> {
    distinct_per_country(ds, columns::CUISINES, "cuisine_count")
}

/// Restaurants per country: `[country_name, restaurant_count]`.
pub fn restaurants_per_country(ds: &DataSet) -> PipelineResult<DataSet> {
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;

    let mut counts: HashMap<String, i64> = HashMap::new();
    for row in &ds.rows {
        if let Some(country) = str_cell(row, country_idx) {
            *counts.entry(country.to_string()).or_default() += 1;
        }
    }

    let mut entries: Vec<(String, i64)> = counts.into_iter().collect();
    sort_ranked(&mut entries, SortOrder::Descending);
    let entries = entries
        .into_iter()
        .map(|(country, n)| (country, Value::Int64(n)))
        .collect();
    Ok(single_key_table(
        columns::COUNTRY_NAME,
        "restaurant_count",
        DataType::Int64,
        entries,
    ))
}

/// Total votes per country: `[country_name, total_votes]`.
pub fn votes_per_country(ds: &DataSet) -> PipelineResult<DataSet> {
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let votes_idx = ds.require_column(columns::VOTES)?;

    let mut sums: HashMap<String, i64> = HashMap::new();
    for row in &ds.rows {
        if let Some(country) = str_cell(row, country_idx) {
            let votes = row.get(votes_idx).and_then(Value::as_i64).unwrap_or(0);
            *sums.entry(country.to_string()).or_default() += votes;
        }
    }

    let mut entries: Vec<(String, i64)> = sums.into_iter().collect();
    sort_ranked(&mut entries, SortOrder::Descending);
    let entries = entries
        .into_iter()
        .map(|(country, votes)| (country, Value::Int64(votes)))
        .collect();
    Ok(single_key_table(
        columns::COUNTRY_NAME,
        "total_votes",
        DataType::Int64,
        entries,
    ))
}

/// Mean cost for two in USD per country, rounded to 2 decimals:
/// `[country_name, average_cost_for_two_USD]`.
pub fn mean_cost_usd_per_country(ds: &DataSet) -> PipelineResult<DataSet> {
    mean_per_country(
        ds,
        columns::AVERAGE_COST_FOR_TWO_USD,
        columns::AVERAGE_COST_FOR_TWO_USD,
    )
}

/// Mean aggregate rating per country, rounded to 2 decimals:
/// `[country_name, aggregate_rating]`.
pub fn mean_rating_per_country(ds: &DataSet) -> PipelineResult<DataSet> {
    mean_per_country(ds, columns::AGGREGATE_RATING, columns::AGGREGATE_RATING)
}

fn distinct_per_country(
    ds: &DataSet,
    value_column: &str,
    metric_name: &str,
) -> PipelineResult<DataSet> {
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let value_idx = ds.require_column(value_column)?;

    let mut distinct: HashMap<String, HashSet<String>> = HashMap::new();
    for row in &ds.rows {
        if let (Some(country), Some(value)) = (str_cell(row, country_idx), str_cell(row, value_idx))
        {
            distinct
                .entry(country.to_string())
                .or_default()
                .insert(value.to_string());
        }
    }

    let mut entries: Vec<(String, i64)> = distinct
        .into_iter()
        .map(|(country, values)| (country, values.len() as i64))
        .collect();
    sort_ranked(&mut entries, SortOrder::Descending);
    let entries = entries
        .into_iter()
        .map(|(country, n)| (country, Value::Int64(n)))
        .collect();
    Ok(single_key_table(
        columns::COUNTRY_NAME,
        metric_name,
        DataType::Int64,
        entries,
    ))
}

fn mean_per_country(
    ds: &DataSet,
    value_column: &str,
    metric_name: &str,
) -> PipelineResult<DataSet> {
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let value_idx = ds.require_column(value_column)?;

    let mut acc: HashMap<String, (f64, u64)> = HashMap::new();
    for row in &ds.rows {
        if let Some(country) = str_cell(row, country_idx) {
            if let Some(value) = row.get(value_idx).and_then(Value::as_f64) {
                let entry = acc.entry(country.to_string()).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }
    }

    let mut entries: Vec<(String, f64)> = acc
        .into_iter()
        .map(|(country, (sum, n))| (country, round2(sum / n as f64)))
        .collect();
    sort_ranked(&mut entries, SortOrder::Descending);
    let entries = entries
        .into_iter()
        .map(|(country, mean)| (country, Value::Float64(mean)))
        .collect();
    Ok(single_key_table(
        columns::COUNTRY_NAME,
        metric_name,
        DataType::Float64,
        entries,
    ))
}
