//! Restaurant and cuisine rankings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{round2, single_key_table, sort_ranked, str_cell, SortOrder};
use crate::error::PipelineResult;
use crate::normalize::columns;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// The single best restaurant for one cuisine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantHighlight {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub country_name: String,
    pub city: String,
    pub cuisine: String,
    /// Cost for two in USD, rounded to 2 decimals.
    pub average_cost_for_two_usd: f64,
    pub aggregate_rating: f64,
}

/// Best restaurant serving `cuisine`, resolving ties by
/// `(aggregate_rating desc, restaurant_id asc)`.
///
/// Returns `Ok(None)` when no row matches the cuisine — an explicit no-data
/// result, distinct from a restaurant with a zero rating.
pub fn best_restaurant_for_cuisine(
    ds: &DataSet,
    cuisine: &str,
) -> PipelineResult<Option<RestaurantHighlight>> {
    let id_idx = ds.require_column(columns::RESTAURANT_ID)?;
    let name_idx = ds.require_column(columns::RESTAURANT_NAME)?;
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let city_idx = ds.require_column(columns::CITY)?;
    let cuisines_idx = ds.require_column(columns::CUISINES)?;
    let cost_idx = ds.require_column(columns::AVERAGE_COST_FOR_TWO_USD)?;
    let rating_idx = ds.require_column(columns::AGGREGATE_RATING)?;

    let mut best: Option<(f64, i64, &[Value])> = None;
    for row in &ds.rows {
        if str_cell(row, cuisines_idx) != Some(cuisine) {
            continue;
        }
        let rating = row.get(rating_idx).and_then(Value::as_f64).unwrap_or(0.0);
        let id = row.get(id_idx).and_then(Value::as_i64).unwrap_or(i64::MAX);
        let better = match &best {
            None => true,
            Some((best_rating, best_id, _)) => {
                rating > *best_rating || (rating == *best_rating && id < *best_id)
            }
        };
        if better {
            best = Some((rating, id, row.as_slice()));
        }
    }

    Ok(best.map(|(rating, id, row)| RestaurantHighlight {
        restaurant_id: id,
        restaurant_name: str_cell(row, name_idx).unwrap_or_default().to_string(),
        country_name: str_cell(row, country_idx).unwrap_or_default().to_string(),
        city: str_cell(row, city_idx).unwrap_or_default().to_string(),
        cuisine: cuisine.to_string(),
        average_cost_for_two_usd: round2(row.get(cost_idx).and_then(Value::as_f64).unwrap_or(0.0)),
        aggregate_rating: rating,
    }))
}

/// Top-N restaurants by `(aggregate_rating desc, restaurant_id asc)`.
///
/// Result table: `[restaurant_id, restaurant_name, country_name, city,
/// cuisines, average_cost_for_two_USD, aggregate_rating, votes]`, with the
/// USD cost rounded to 2 decimals.
pub fn top_restaurants(ds: &DataSet, n: usize) -> PipelineResult<DataSet> {
    let id_idx = ds.require_column(columns::RESTAURANT_ID)?;
    let name_idx = ds.require_column(columns::RESTAURANT_NAME)?;
    let country_idx = ds.require_column(columns::COUNTRY_NAME)?;
    let city_idx = ds.require_column(columns::CITY)?;
    let cuisines_idx = ds.require_column(columns::CUISINES)?;
    let cost_idx = ds.require_column(columns::AVERAGE_COST_FOR_TWO_USD)?;
    let rating_idx = ds.require_column(columns::AGGREGATE_RATING)?;
    let votes_idx = ds.require_column(columns::VOTES)?;

    let mut ranked: Vec<(f64, i64, &Vec<Value>)> = ds
        .rows
        .iter()
        .map(|row| {
            let rating = row.get(rating_idx).and_then(Value::as_f64).unwrap_or(0.0);
            let id = row.get(id_idx).and_then(Value::as_i64).unwrap_or(i64::MAX);
            (rating, id, row)
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });
    ranked.truncate(n);

    let schema = Schema::new(vec![
        Field::new(columns::RESTAURANT_ID, DataType::Int64),
        Field::new(columns::RESTAURANT_NAME, DataType::Utf8),
        Field::new(columns::COUNTRY_NAME, DataType::Utf8),
        Field::new(columns::CITY, DataType::Utf8),
        Field::new(columns::CUISINES, DataType::Utf8),
        Field::new(columns::AVERAGE_COST_FOR_TWO_USD, DataType::Float64),
        Field::new(columns::AGGREGATE_RATING, DataType::Float64),
        Field::new(columns::VOTES, DataType::Int64),
    ]);
    let rows = ranked
        .into_iter()
        .map(|(rating, id, row)| {
            vec![
                Value::Int64(id),
                Value::Utf8(str_cell(row, name_idx).unwrap_or_default().to_string()),
                Value::Utf8(str_cell(row, country_idx).unwrap_or_default().to_string()),
                Value::Utf8(str_cell(row, city_idx).unwrap_or_default().to_string()),
                Value::Utf8(str_cell(row, cuisines_idx).unwrap_or_default().to_string()),
                Value::Float64(round2(
                    row.get(cost_idx).and_then(Value::as_f64).unwrap_or(0.0),
                )),
                Value::Float64(rating),
                Value::Int64(row.get(votes_idx).and_then(Value::as_i64).unwrap_or(0)),
            ]
        })
        .collect();
    Ok(DataSet::new(schema, rows))
}

/// Top-N cuisines by mean rating, descending: `[cuisines, aggregate_rating]`.
pub fn best_cuisines(ds: &DataSet, n: usize) -> PipelineResult<DataSet> {
    mean_rating_per_cuisine(ds, n, SortOrder::Descending)
}

/// Bottom-N cuisines by mean rating, ascending: `[cuisines, aggregate_rating]`.
pub fn worst_cuisines(ds: &DataSet, n: usize) -> PipelineResult<DataSet> {
    mean_rating_per_cuisine(ds, n, SortOrder::Ascending)
}

fn mean_rating_per_cuisine(ds: &DataSet, n: usize, order: SortOrder) -> PipelineResult<DataSet> {
    let cuisines_idx = ds.require_column(columns::CUISINES)?;
    let rating_idx = ds.require_column(columns::AGGREGATE_RATING)?;

    let mut acc: HashMap<String, (f64, u64)> = HashMap::new();
    for row in &ds.rows {
        if let Some(cuisine) = str_cell(row, cuisines_idx) {
            if let Some(rating) = row.get(rating_idx).and_then(Value::as_f64) {
                let entry = acc.entry(cuisine.to_string()).or_insert((0.0, 0));
                entry.0 += rating;
                entry.1 += 1;
            }
        }
    }

    let mut entries: Vec<(String, f64)> = acc
        .into_iter()
        .map(|(cuisine, (sum, count))| (cuisine, round2(sum / count as f64)))
        .collect();
    sort_ranked(&mut entries, order);
    entries.truncate(n);
    let entries = entries
        .into_iter()
        .map(|(cuisine, mean)| (cuisine, Value::Float64(mean)))
        .collect();
    Ok(single_key_table(
        columns::CUISINES,
        columns::AGGREGATE_RATING,
        DataType::Float64,
        entries,
    ))
}
