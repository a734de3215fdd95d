//! Record-label tier partition for the scatter plot
//!
//! Labels are grouped by their majority genre with the same tiering rule as
//! the review histogram: top N−1 majority genres by label count form the
//! primary tier, the rest condense into "Various". Statistics pass through
//! untouched; mean/median/std_dev come precomputed from the source file.
//!
//! Labels under the count cutoff (default 5 reviews) are dropped before any
//! tiering; a three-review label's standard deviation is noise, not signal.

use crate::data::LabelStat;
use crate::selection::Mode;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::tiering::{GenreTiers, VARIOUS};

/// Labels with fewer reviews than this never reach the scatter plot.
pub const DEFAULT_COUNT_CUTOFF: u32 = 5;

/// Both precomputed scatter views plus the partition that produced them.
///
/// Each view is sorted by review count descending so large circles are drawn
/// first and small ones stay clickable on top of them.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTiers {
    pub tiers: GenreTiers,
    primary: Vec<LabelStat>,
    secondary: Vec<LabelStat>,
    /// Labels dropped by the count cutoff
    pub dropped: usize,
}

impl LabelTiers {
    pub fn build(labels: &[LabelStat], count_cutoff: u32, palette_size: usize) -> Self {
        let kept: Vec<LabelStat> = labels
            .iter()
            .filter(|l| l.count >= count_cutoff)
            .cloned()
            .collect();
        let dropped = labels.len() - kept.len();

        // One credit per label toward its majority genre; same descending
        // sort and lexicographic tie-break as review-genre tiering.
        let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
        for label in &kept {
            *counts.entry(&label.majority_genre).or_insert(0.0) += 1.0;
        }
        let mut ranked: Vec<(String, f64)> = counts
            .into_iter()
            .map(|(g, c)| (g.to_string(), c))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        let tiers = GenreTiers::split(&ranked, palette_size);

        let in_secondary =
            |l: &LabelStat| tiers.secondary.iter().any(|g| *g == l.majority_genre);

        let mut secondary: Vec<LabelStat> =
            kept.iter().filter(|l| in_secondary(l)).cloned().collect();
        sort_by_count_desc(&mut secondary);

        // Primary view keeps every label: secondary-tier labels are
        // re-badged "Various" so the view still totals the whole dataset.
        let mut primary: Vec<LabelStat> = kept
            .iter()
            .filter(|l| !in_secondary(l))
            .cloned()
            .chain(secondary.iter().cloned().map(|mut l| {
                l.majority_genre = VARIOUS.to_string();
                l
            }))
            .collect();
        sort_by_count_desc(&mut primary);

        Self {
            tiers,
            primary,
            secondary,
            dropped,
        }
    }

    pub fn visible(&self, mode: Mode) -> &[LabelStat] {
        match mode {
            Mode::Primary => &self.primary,
            Mode::Secondary => &self.secondary,
        }
    }
}

fn sort_by_count_desc(labels: &mut [LabelStat]) {
    labels.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
}
