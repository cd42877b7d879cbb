//! `restaurant-analytics` is the cleaning and aggregation core behind a
//! restaurant-listings dashboard.
//!
//! The host (a presentation layer) hands over the raw listings table — as an
//! in-memory [`types::DataSet`] or a CSV payload — and gets back a cleaned
//! working table, filtered views, and ranked aggregation result tables ready
//! for display. The core itself performs no file or network I/O.
//!
//! ## Pipeline
//!
//! 1. [`ingestion`]: parse an in-memory CSV payload against the fixed raw
//!    schema (optional; the host may build the `DataSet` itself)
//! 2. [`cleaning`]: normalize column names, deduplicate, drop the known
//!    outlier, canonicalize cuisines, and derive the enrichment columns
//!    (`color_name`, `country_name`, `price_type`, `exchange_rate`,
//!    `average_cost_for_two_USD`) from the fixed [`reference`] tables
//! 3. [`filtering`]: apply one display request's [`filtering::FilterCriteria`]
//! 4. [`aggregate`]: ranked group-by queries and scalar metrics over the
//!    cleaned (or filtered) table
//!
//! The cleaned table is built once per session and is read-only afterwards;
//! every filter and aggregation returns a fresh table and never mutates its
//! input, so one cleaned table can safely serve concurrent readers.
//!
//! ## Quick example
//!
//! ```
//! use restaurant_analytics::aggregate::overview_metrics;
//! use restaurant_analytics::cleaning::clean;
//! use restaurant_analytics::filtering::{apply_filters, FilterCriteria};
//! use restaurant_analytics::ingestion::{ingest_csv_from_reader, raw_listing_schema};
//!
//! # fn main() -> Result<(), restaurant_analytics::PipelineError> {
//! let payload = "\
//! Restaurant ID,Restaurant Name,Country Code,City,Longitude,Latitude,Cuisines,Average Cost for two,Price range,Aggregate rating,Votes,Rating color,Has Table booking,Is delivering now,Has Online delivery,Switch to order menu
//! 1,Sultans of Spice,1,New Delhi,77.2,28.6,\"Chinese, Thai\",500,2,4.5,120,3F7E00,1,0,1,0
//! 2,Ocean Grill,216,Seattle,-122.3,47.6,Seafood,80,3,4.1,250,5BA829,0,0,0,0
//! ";
//! let mut rdr = csv::ReaderBuilder::new()
//!     .has_headers(true)
//!     .from_reader(payload.as_bytes());
//!
//! let raw = ingest_csv_from_reader(&mut rdr, &raw_listing_schema())?;
//! let cleaned = clean(&raw)?;
//!
//! let metrics = overview_metrics(&cleaned)?;
//! assert_eq!(metrics.restaurants, 2);
//! assert_eq!(metrics.countries, 2);
//!
//! let mut criteria = FilterCriteria::default();
//! criteria.countries.insert("India".to_string());
//! let india = apply_filters(&cleaned, &criteria)?;
//! assert_eq!(india.row_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! Cleaning fails loudly: a raw table with a missing or unexpected column is
//! a [`PipelineError::Schema`], and a rating-color or country code with no
//! reference-table entry is a [`PipelineError::UnknownReferenceKey`] naming
//! the row and key. Empty results are never errors — filters and
//! aggregations return empty tables (or `None` for single-row "best of"
//! queries) so the display layer can render a no-data state.

pub mod aggregate;
pub mod cleaning;
pub mod error;
pub mod filtering;
pub mod ingestion;
pub mod normalize;
pub mod observability;
pub mod reference;
pub mod types;

pub use error::{PipelineError, PipelineResult};
