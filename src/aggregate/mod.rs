//! Aggregation engine
//!
//! Turns the raw review and label records into the read-only derived tables
//! every view renders from:
//!
//! - [`facts`]: the tidy (score bucket, genre) → fractional-count table,
//!   precomputed once per load as a primary-tier and a secondary-tier view
//! - [`tiering`]: the genre tier partition that condenses the long tail of
//!   genres into a palette-safe set plus a synthetic "Various" bucket
//! - [`labels`]: the matching tier partition of record-label aggregates for
//!   the scatter plot
//! - [`layout`]: draw-ready stacked-bar and scatter-point geometry
//!
//! Everything here is pure computation over immutable inputs; all tables are
//! built once at load time and cached for the lifetime of the dataset.

pub mod facts;
pub mod labels;
pub mod layout;
pub mod tiering;

pub use facts::{bucket_score, score_bucket, FactRow, FactTable, FactTables, SCORE_BUCKETS};
pub use labels::{LabelTiers, DEFAULT_COUNT_CUTOFF};
pub use layout::{scatter_points, stack_max, stacked_layout, BarSegment, ScatterPoint};
pub use tiering::{genre_counts, GenreTiers, RETURN_TO_PRIMARY, VARIOUS};
