//! Draw-ready geometry for the two main charts
//!
//! The render layer receives finished numbers: stacked-bar baselines and
//! heights for the histogram, positioned and sized circles for the scatter
//! plot. No aggregation or scale derivation happens past this point.

use crate::data::LabelStat;
use crate::palette::ColorScale;
use serde::Serialize;
use std::collections::HashMap;

use super::facts::{score_bucket, FactRow, SCORE_BUCKETS};

/// Scatter circle radii in pixels, √count-scaled between these bounds.
pub const RADIUS_RANGE: (f64, f64) = (4.0, 30.0);

/// One rectangle of a stacked bar: the `genre` layer's slice of the bar at
/// `score`, spanning [baseline, baseline + height) in count units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub genre: String,
    pub score: f64,
    pub baseline: f64,
    pub height: f64,
}

/// One scatter circle: a record label positioned by its score statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub label: String,
    /// Mean review score
    pub x: f64,
    /// Standard deviation of review scores
    pub y: f64,
    pub radius: f64,
    pub color: String,
    pub genre: String,
}

/// Stack tidy rows into bar segments.
///
/// Layer order is ascending by each genre's total count over the visible
/// rows, ties broken by the genre's position in the fact table (= first
/// appearance in `rows`), so small layers sit at the bottom and the order
/// is stable across renders. Output is layer-major: every bucket of the
/// lowest layer first. Zero-count segments are kept; the render layer
/// needs the same key set on every redraw.
pub fn stacked_layout(rows: &[FactRow]) -> Vec<BarSegment> {
    let mut genres: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();
    let mut cells: HashMap<(&str, usize), f64> = HashMap::new();
    for row in rows {
        let Some(bucket) = score_bucket(row.score) else {
            continue;
        };
        if !totals.contains_key(row.genre) {
            genres.push(row.genre);
        }
        *totals.entry(row.genre).or_insert(0.0) += row.count;
        *cells.entry((row.genre, bucket)).or_insert(0.0) += row.count;
    }

    let mut layers: Vec<(usize, &str)> = genres.iter().copied().enumerate().collect();
    layers.sort_by(|(ai, ag), (bi, bg)| {
        totals[ag]
            .partial_cmp(&totals[bg])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| ai.cmp(bi))
    });

    let mut baselines = [0.0; SCORE_BUCKETS];
    let mut segments = Vec::with_capacity(layers.len() * SCORE_BUCKETS);
    for (_, genre) in layers {
        for (bucket, baseline) in baselines.iter_mut().enumerate() {
            let height = cells.get(&(genre, bucket)).copied().unwrap_or(0.0);
            segments.push(BarSegment {
                genre: genre.to_string(),
                score: bucket as f64 / 10.0,
                baseline: *baseline,
                height,
            });
            *baseline += height;
        }
    }
    segments
}

/// Tallest stacked bar, for the y-scale domain.
pub fn stack_max(segments: &[BarSegment]) -> f64 {
    segments
        .iter()
        .map(|s| s.baseline + s.height)
        .fold(0.0, f64::max)
}

/// Position and size the visible labels' circles.
///
/// Radius follows a √count scale over the visible counts so circle *area*
/// tracks review count; a single-count degenerate domain pins everything to
/// the middle of the radius range.
pub fn scatter_points(labels: &[LabelStat], scale: &ColorScale) -> Vec<ScatterPoint> {
    let (r_min, r_max) = RADIUS_RANGE;
    let lo = labels.iter().map(|l| l.count).min().unwrap_or(0) as f64;
    let hi = labels.iter().map(|l| l.count).max().unwrap_or(0) as f64;
    let (sq_lo, sq_hi) = (lo.sqrt(), hi.sqrt());
    let radius = |count: u32| {
        if sq_hi == sq_lo {
            return (r_min + r_max) / 2.0;
        }
        let t = ((count as f64).sqrt() - sq_lo) / (sq_hi - sq_lo);
        r_min + t * (r_max - r_min)
    };
    labels
        .iter()
        .map(|l| ScatterPoint {
            label: l.label.clone(),
            x: l.mean,
            y: l.std_dev,
            radius: radius(l.count),
            color: scale.color(&l.majority_genre).to_string(),
            genre: l.majority_genre.clone(),
        })
        .collect()
}
