//! Export of the aggregated tables
//!
//! Two formats, picked by file extension:
//!
//! - **JSON**: the full derived state (tier partition, both fact-table
//!   views, both scatter views) for programmatic consumption
//! - **CSV**: the tidy fact rows, spreadsheet-friendly
//!
//! # Usage
//!
//! ```ignore
//! use needledrop::report;
//!
//! report::generate("aggregates.json", &facts, &labels)?;
//! report::generate("aggregates.csv", &facts, &labels)?;
//! ```

pub mod csv;
pub mod json;

use crate::aggregate::{FactTables, LabelTiers};
use crate::selection::Mode;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Generate an export in the format matching the file extension.
pub fn generate<P: AsRef<Path>>(
    path: P,
    facts: &FactTables,
    labels: &LabelTiers,
) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "json" => json::write(&mut file, facts, labels),
        _ => csv::write(&mut file, facts),
    }
}

/// Headline numbers for a loaded dataset, shown by the CLI and the
/// dashboard status line.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Reviews that made it into the fact table
    pub reviews: usize,
    /// Reviews excluded for an invalid score
    pub rejected_reviews: usize,
    pub primary_genres: usize,
    pub secondary_genres: usize,
    /// Labels past the count cutoff
    pub labels: usize,
    pub dropped_labels: usize,
}

impl Summary {
    pub fn from_tables(facts: &FactTables, labels: &LabelTiers) -> Self {
        Self {
            reviews: facts.table(Mode::Primary).total().round() as usize,
            rejected_reviews: facts.rejected,
            primary_genres: facts.tiers.primary.len(),
            secondary_genres: facts.tiers.secondary.len(),
            labels: labels.visible(Mode::Primary).len(),
            dropped_labels: labels.dropped,
        }
    }
}
