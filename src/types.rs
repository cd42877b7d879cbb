//! Core data model types for the pipeline.
//!
//! The whole crate operates on an in-memory [`DataSet`]: the raw listings
//! table handed over by the host, the cleaned working table, filtered views
//! and aggregation result tables are all `DataSet`s with different [`Schema`]s.

use crate::error::{PipelineError, PipelineResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of fields describing the shape of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Integer view of the value, if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            Value::Int64(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String view of the value, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`]
/// fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of `name`, or a schema error naming the column.
    pub fn require_column(&self, name: &str) -> PipelineResult<usize> {
        self.schema.index_of(name).ok_or_else(|| PipelineError::Schema {
            message: format!(
                "missing required column '{name}'. columns={:?}",
                self.schema.field_names().collect::<Vec<_>>()
            ),
        })
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema; the original table
    /// is left untouched.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset without the named column.
    ///
    /// Returns an unchanged clone if the column is not present.
    pub fn drop_column(&self, name: &str) -> Self {
        let Some(idx) = self.schema.index_of(name) else {
            return self.clone();
        };

        let mut fields = self.schema.fields.clone();
        fields.remove(idx);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = row.clone();
                if idx < out.len() {
                    out.remove(idx);
                }
                out
            })
            .collect();
        Self {
            schema: Schema::new(fields),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("restaurant_id", DataType::Int64),
            Field::new("city", DataType::Utf8),
            Field::new("votes", DataType::Int64),
        ]);
        let rows = vec![
            vec![Value::Int64(1), Value::Utf8("Pune".to_string()), Value::Int64(10)],
            vec![Value::Int64(2), Value::Utf8("Doha".to_string()), Value::Int64(20)],
            vec![Value::Int64(3), Value::Utf8("Pune".to_string()), Value::Int64(30)],
        ];
        DataSet::new(schema, rows)
    }

    #[test]
    fn index_of_and_require_column() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.index_of("city"), Some(1));
        assert_eq!(ds.schema.index_of("missing"), None);
        assert_eq!(ds.require_column("votes").unwrap(), 2);

        let err = ds.require_column("missing").unwrap_err();
        assert!(err.to_string().contains("missing required column 'missing'"));
    }

    #[test]
    fn filter_rows_preserves_schema_and_original() {
        let ds = sample_dataset();
        let city_idx = ds.schema.index_of("city").unwrap();

        let out = ds.filter_rows(|row| row[city_idx].as_str() == Some("Pune"));
        assert_eq!(out.schema, ds.schema);
        assert_eq!(out.row_count(), 2);
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn drop_column_removes_field_and_values() {
        let ds = sample_dataset();
        let out = ds.drop_column("city");
        assert_eq!(out.schema.index_of("city"), None);
        assert_eq!(out.rows[0], vec![Value::Int64(1), Value::Int64(10)]);

        // Unknown column is a no-op.
        let same = ds.drop_column("not_there");
        assert_eq!(same, ds);
    }

    #[test]
    fn value_views() {
        assert_eq!(Value::Int64(7).as_f64(), Some(7.0));
        assert_eq!(Value::Float64(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Utf8("x".to_string()).as_f64(), None);
        assert_eq!(Value::Null.as_str(), None);
    }
}
