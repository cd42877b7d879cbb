use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type shared across ingestion, cleaning, filtering and aggregation.
///
/// Filter and aggregation functions are total over cleaned tables; in steady
/// state they only fail when handed a table whose schema does not carry the
/// columns they need ([`PipelineError::Schema`]). Cleaning can additionally
/// fail on reference-table misses, which indicate a data-quality problem that
/// must be fixed upstream rather than silently skipped.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input is missing an expected column or carries an unexpected one.
    #[error("schema mismatch: {message}")]
    Schema { message: String },

    /// A row's lookup key has no entry in its reference table.
    #[error("row {row}: no {table} entry for key '{key}'")]
    UnknownReferenceKey {
        /// Zero-based position of the offending row in the table being cleaned.
        row: usize,
        /// Name of the reference table that missed.
        table: &'static str,
        /// The key that had no entry.
        key: String,
    },

    /// CSV payload decode error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    Parse {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
