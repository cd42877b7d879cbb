#![allow(dead_code)]

use restaurant_analytics::ingestion::raw_listing_schema;
use restaurant_analytics::types::{DataSet, Value};

/// One raw listing row for fixture tables, with sane defaults (an Indian
/// restaurant with a valid color code). Override fields with struct-update
/// syntax.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: i64,
    pub name: &'static str,
    pub country: i64,
    pub city: &'static str,
    pub cuisines: Option<&'static str>,
    pub cost: f64,
    pub price_range: i64,
    pub rating: f64,
    pub votes: i64,
    pub color: &'static str,
    pub table_booking: i64,
    pub delivering_now: i64,
    pub online_delivery: i64,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Sultans of Spice",
            country: 1,
            city: "New Delhi",
            cuisines: Some("North Indian"),
            cost: 500.0,
            price_range: 2,
            rating: 4.0,
            votes: 100,
            color: "3F7E00",
            table_booking: 0,
            delivering_now: 0,
            online_delivery: 0,
        }
    }
}

impl Listing {
    pub fn row(&self) -> Vec<Value> {
        vec![
            Value::Int64(self.id),
            Value::Utf8(self.name.to_string()),
            Value::Int64(self.country),
            Value::Utf8(self.city.to_string()),
            Value::Float64(77.2),
            Value::Float64(28.6),
            self.cuisines
                .map_or(Value::Null, |c| Value::Utf8(c.to_string())),
            Value::Float64(self.cost),
            Value::Int64(self.price_range),
            Value::Float64(self.rating),
            Value::Int64(self.votes),
            Value::Utf8(self.color.to_string()),
            Value::Int64(self.table_booking),
            Value::Int64(self.delivering_now),
            Value::Int64(self.online_delivery),
            Value::Int64(0),
        ]
    }
}

/// Build a raw listings table from fixture rows.
pub fn raw_table(listings: &[Listing]) -> DataSet {
    DataSet::new(
        raw_listing_schema(),
        listings.iter().map(Listing::row).collect(),
    )
}

/// Fetch a cell from a table by row index and column name.
pub fn cell(ds: &DataSet, row: usize, column: &str) -> Value {
    let idx = ds.schema.index_of(column).expect("column exists");
    ds.rows[row][idx].clone()
}
