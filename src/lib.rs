//! Needledrop - Explore album review scores
//!
//! Needledrop turns a static export of album reviews and record-label
//! aggregates into a linked-view dashboard: a stacked histogram of review
//! scores by genre, a scatter plot of per-label score statistics, and a
//! line chart of one label's scores over time, with an album list panel
//! tying them together.
//!
//! # Overview
//!
//! The interesting work happens before anything is drawn:
//!
//! 1. **Aggregation** ([`aggregate`]): reviews become a tidy
//!    (score, genre) fact table with fractional genre credit, and the
//!    long tail of genres is condensed into a palette-safe "Various"
//!    bucket that can still be drilled into.
//! 2. **Selection** ([`selection`]): each chart owns a small pure state
//!    machine (tier mode, genre filter, active segment) and derives its
//!    visible subset from state alone.
//! 3. **Coordination** ([`bus`]): clicking or hovering in one chart
//!    updates the others through a typed publish/subscribe bus; views
//!    never call each other.
//!
//! # Quick Start
//!
//! ```no_run
//! use needledrop::data;
//! use needledrop::views::{Dashboard, Gesture};
//!
//! let sources = data::load_dir(std::path::Path::new("./data"));
//! let mut dashboard = Dashboard::new(sources, 5);
//!
//! dashboard.apply_gesture(Gesture::SegmentClick {
//!     genre: "Rock".to_string(),
//!     score: 7.5,
//! }).unwrap();
//!
//! if let Some(list) = &dashboard.album_list {
//!     for row in list.borrow().rows() {
//!         println!("{}: {:.1}", row.album, row.score);
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - [`data`]: record types and static-file loading
//! - [`aggregate`]: fact tables, genre tiering, draw-ready geometry
//! - [`selection`]: per-view selection state machine
//! - [`bus`]: cross-view event bus
//! - [`views`]: presentation adapters and dashboard wiring
//! - [`report`]: JSON/CSV export of the aggregated tables
//! - [`serve`]: local HTTP server embedding the browser UI

pub mod aggregate;
pub mod bus;
pub mod data;
pub mod error;
pub mod palette;
pub mod report;
pub mod selection;
pub mod serve;
pub mod views;

pub use aggregate::{FactTables, GenreTiers, LabelTiers};
pub use bus::{DashboardEvent, EventBus, EventKind};
pub use data::{LabelStat, Review, Sources};
pub use error::LoadError;
pub use palette::Theme;
pub use selection::{Mode, SelectionState};
pub use views::{Dashboard, Gesture};
