//! Genre tiering: condensing a long-tailed categorical dimension
//!
//! A few hundred genres cannot share one ordinal color scale. The tier
//! partition keeps the N−1 highest-count genres as the *primary* tier and
//! absorbs the remainder, the *secondary* tier, into one synthetic "Various"
//! bucket. The secondary tier is still reachable: clicking "Various" in a
//! legend switches the view into secondary mode, where a "Return to primary
//! view" cell switches back. The two sentinel strings never occur in the
//! source data (a real genre spelled like one is a documented data-modeling
//! hazard, not a runtime condition we detect).

use crate::data::Review;
use crate::selection::Mode;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Synthetic bucket absorbing every secondary-tier genre in primary view.
pub const VARIOUS: &str = "Various";

/// Synthetic legend cell that leaves secondary view.
pub const RETURN_TO_PRIMARY: &str = "Return to primary view";

/// True for the two synthetic legend strings. Sentinels route to a mode
/// switch, never to a genre filter, and carry no aggregated data of their
/// own.
pub fn is_sentinel(genre: &str) -> bool {
    genre == VARIOUS || genre == RETURN_TO_PRIMARY
}

/// Occurrence count per genre with fractional credit: a review tagged with
/// k genres contributes 1/k to each of them, so the counts total the review
/// count. Sorted by count descending, ties by genre name ascending so equal
/// counts partition the same way on every run.
pub fn genre_counts(reviews: &[Review]) -> Vec<(String, f64)> {
    let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
    for review in reviews {
        let credit = 1.0 / review.genres.len() as f64;
        for genre in &review.genres {
            *counts.entry(genre).or_insert(0.0) += credit;
        }
    }
    let mut ranked: Vec<(String, f64)> = counts
        .into_iter()
        .map(|(genre, count)| (genre.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}

/// The genre tier partition. Both lists are count-descending; together they
/// cover the genre universe exactly once, and neither contains a sentinel.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GenreTiers {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
}

impl GenreTiers {
    /// Split ranked (genre, count) pairs at N−1, where N is the palette
    /// size: the last palette slot is reserved for "Various". Input order is
    /// authoritative; callers rank with [`genre_counts`] or equivalent.
    pub fn split(ranked: &[(String, f64)], palette_size: usize) -> Self {
        let cap = palette_size.saturating_sub(1).min(ranked.len());
        Self {
            primary: ranked[..cap].iter().map(|(g, _)| g.clone()).collect(),
            secondary: ranked[cap..].iter().map(|(g, _)| g.clone()).collect(),
        }
    }

    /// Whether a segment genre is displayable in the given tier. "Various"
    /// resolves in primary view; secondary view shows only real secondary
    /// genres.
    pub fn resolves(&self, mode: Mode, genre: &str) -> bool {
        match mode {
            Mode::Primary => genre == VARIOUS || self.primary.iter().any(|g| g == genre),
            Mode::Secondary => self.secondary.iter().any(|g| g == genre),
        }
    }

    /// Legend cells for a tier: the tier's genres plus its sentinel, in the
    /// order the color scale assigns palette slots.
    pub fn legend(&self, mode: Mode) -> Vec<String> {
        let (genres, sentinel) = match mode {
            Mode::Primary => (&self.primary, VARIOUS),
            Mode::Secondary => (&self.secondary, RETURN_TO_PRIMARY),
        };
        let mut cells = genres.clone();
        cells.push(sentinel.to_string());
        cells
    }
}
