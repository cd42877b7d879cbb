//! CSV payload adapter.
//!
//! The core never touches the filesystem: the host hands over either a
//! ready-made [`DataSet`] or an in-memory CSV payload. This module parses
//! such a payload against a declared [`Schema`].
//!
//! Rules:
//!
//! - the CSV must have headers
//! - headers must contain all schema fields (order can differ)
//! - each value is parsed according to the schema field type; empty cells
//!   become [`Value::Null`]

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// The fixed raw schema of the restaurant-listings export.
pub fn raw_listing_schema() -> Schema {
    Schema::new(vec![
        Field::new("Restaurant ID", DataType::Int64),
        Field::new("Restaurant Name", DataType::Utf8),
        Field::new("Country Code", DataType::Int64),
        Field::new("City", DataType::Utf8),
        Field::new("Longitude", DataType::Float64),
        Field::new("Latitude", DataType::Float64),
        Field::new("Cuisines", DataType::Utf8),
        Field::new("Average Cost for two", DataType::Float64),
        Field::new("Price range", DataType::Int64),
        Field::new("Aggregate rating", DataType::Float64),
        Field::new("Votes", DataType::Int64),
        Field::new("Rating color", DataType::Utf8),
        Field::new("Has Table booking", DataType::Int64),
        Field::new("Is delivering now", DataType::Int64),
        Field::new("Has Online delivery", DataType::Int64),
        Field::new("Switch to order menu", DataType::Int64),
    ])
}

/// Parse a CSV payload from an existing reader into an in-memory [`DataSet`].
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> PipelineResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(PipelineError::Schema {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, &field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> PipelineResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed.parse::<i64>().map(Value::Int64).map_err(|e| {
            PipelineError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }
        }),
        DataType::Float64 => trimmed.parse::<f64>().map(Value::Float64).map_err(|e| {
            PipelineError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }
        }),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(|message| {
            PipelineError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message,
            }
        }),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_schema_has_sixteen_columns() {
        let schema = raw_listing_schema();
        assert_eq!(schema.fields.len(), 16);
        assert_eq!(schema.index_of("Restaurant ID"), Some(0));
        assert_eq!(schema.index_of("Switch to order menu"), Some(15));
    }

    #[test]
    fn empty_cells_parse_to_null() {
        let v = parse_typed_value(2, "Cuisines", &DataType::Utf8, "  ").unwrap();
        assert_eq!(v, Value::Null);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("Yes"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }
}
