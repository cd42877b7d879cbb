//! Column-name normalization for the raw listings schema.
//!
//! The source export names columns with mixed case and spaces
//! (`"Restaurant ID"`, `"Average Cost for two"`). [`normalize_columns`]
//! renames every column to the canonical snake_case convention and validates
//! the result against the fixed schema contract: all core columns must be
//! present, and anything outside the known set is rejected.

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, Field, Schema};

/// Canonical column names of the working table.
pub mod columns {
    pub const RESTAURANT_ID: &str = "restaurant_id";
    pub const RESTAURANT_NAME: &str = "restaurant_name";
    pub const COUNTRY_CODE: &str = "country_code";
    pub const CITY: &str = "city";
    pub const LONGITUDE: &str = "longitude";
    pub const LATITUDE: &str = "latitude";
    pub const CUISINES: &str = "cuisines";
    pub const AVERAGE_COST_FOR_TWO: &str = "average_cost_for_two";
    pub const PRICE_RANGE: &str = "price_range";
    pub const AGGREGATE_RATING: &str = "aggregate_rating";
    pub const VOTES: &str = "votes";
    pub const RATING_COLOR: &str = "rating_color";
    pub const HAS_TABLE_BOOKING: &str = "has_table_booking";
    pub const IS_DELIVERING_NOW: &str = "is_delivering_now";
    pub const HAS_ONLINE_DELIVERY: &str = "has_online_delivery";
    /// Constant-valued flag in the source export; dropped by cleaning.
    pub const SWITCH_TO_ORDER_MENU: &str = "switch_to_order_menu";

    // Derived by cleaning.
    pub const COLOR_NAME: &str = "color_name";
    pub const COUNTRY_NAME: &str = "country_name";
    pub const PRICE_TYPE: &str = "price_type";
    pub const EXCHANGE_RATE: &str = "exchange_rate";
    pub const AVERAGE_COST_FOR_TWO_USD: &str = "average_cost_for_two_USD";
}

/// The fifteen columns every working table must carry.
pub const CORE_COLUMNS: [&str; 15] = [
    columns::RESTAURANT_ID,
    columns::RESTAURANT_NAME,
    columns::COUNTRY_CODE,
    columns::CITY,
    columns::LONGITUDE,
    columns::LATITUDE,
    columns::CUISINES,
    columns::AVERAGE_COST_FOR_TWO,
    columns::PRICE_RANGE,
    columns::AGGREGATE_RATING,
    columns::VOTES,
    columns::RATING_COLOR,
    columns::HAS_TABLE_BOOKING,
    columns::IS_DELIVERING_NOW,
    columns::HAS_ONLINE_DELIVERY,
];

/// Columns appended by the cleaning step, in output order.
pub const DERIVED_COLUMNS: [&str; 5] = [
    columns::COLOR_NAME,
    columns::COUNTRY_NAME,
    columns::PRICE_TYPE,
    columns::EXCHANGE_RATE,
    columns::AVERAGE_COST_FOR_TWO_USD,
];

/// Canonicalize one raw column name.
///
/// Title-cases each whitespace-separated word, removes the spaces, then
/// converts the PascalCase result to snake_case:
///
/// ```
/// use restaurant_analytics::normalize::canonical_column_name;
///
/// assert_eq!(canonical_column_name("Restaurant ID"), "restaurant_id");
/// assert_eq!(canonical_column_name("Average Cost for two"), "average_cost_for_two");
/// assert_eq!(canonical_column_name("Votes"), "votes");
/// ```
pub fn canonical_column_name(raw: &str) -> String {
    let mut pascal = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            pascal.extend(first.to_uppercase());
            for c in chars {
                pascal.extend(c.to_lowercase());
            }
        }
    }

    let mut snake = String::with_capacity(pascal.len() + 4);
    for c in pascal.chars() {
        if c.is_uppercase() {
            if !snake.is_empty() {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

fn is_known(name: &str) -> bool {
    name == columns::SWITCH_TO_ORDER_MENU
        || CORE_COLUMNS.contains(&name)
        || DERIVED_COLUMNS.contains(&name)
}

/// Rename every column to its canonical name and validate the schema.
///
/// Names that are already canonical pass through unchanged, so a cleaned
/// table (which carries derived columns like `average_cost_for_two_USD`)
/// normalizes to itself. Validation fails with [`PipelineError::Schema`] if
/// any core column is missing or any column falls outside the known set.
pub fn normalize_columns(ds: &DataSet) -> PipelineResult<DataSet> {
    let mut fields = Vec::with_capacity(ds.schema.fields.len());
    for field in &ds.schema.fields {
        let name = if is_known(&field.name) {
            field.name.clone()
        } else {
            canonical_column_name(&field.name)
        };

        if !is_known(&name) {
            return Err(PipelineError::Schema {
                message: format!("unexpected column '{}' (normalized to '{name}')", field.name),
            });
        }
        fields.push(Field::new(name, field.data_type.clone()));
    }

    let schema = Schema::new(fields);
    let missing: Vec<&str> = CORE_COLUMNS
        .iter()
        .copied()
        .filter(|name| schema.index_of(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema {
            message: format!("missing required columns {missing:?}"),
        });
    }

    Ok(DataSet::new(schema, ds.rows.clone()))
}
