//! The tidy score × genre fact table
//!
//! One fractional-count accumulator per (score bucket, genre) pair, covering
//! all 101 buckets for every genre in a tier, zero cells included, so the
//! stacking layout sees a stable key set no matter what is filtered. Built
//! once per dataset load as two precomputed views:
//!
//! - primary view: primary-tier genres plus a condensed "Various" column
//!   summing every secondary genre, so the view always totals 100% of the
//!   data
//! - secondary view: the long-tail genres by themselves
//!
//! Accumulators are kept in an explicit genre-indexed table, iterated in
//! ranked genre order; nothing depends on map iteration order.

use crate::data::Review;
use crate::selection::Mode;
use serde::Serialize;
use std::collections::HashMap;

use super::tiering::{genre_counts, GenreTiers, VARIOUS};

/// Scores are quantized to tenths over [0, 10]: 101 discrete buckets.
pub const SCORE_BUCKETS: usize = 101;

/// Bucket index for a score, or `None` when the score is off the 0.1 grid
/// or outside [0, 10]. Out-of-range input must never be clamped into a
/// neighboring bucket; the caller rejects the record instead.
pub fn score_bucket(score: f64) -> Option<usize> {
    let scaled = score * 10.0;
    let bucket = scaled.round();
    if (scaled - bucket).abs() > 1e-6 {
        return None;
    }
    if !(0.0..=100.0).contains(&bucket) {
        return None;
    }
    Some(bucket as usize)
}

/// The score at the center of a bucket.
pub fn bucket_score(bucket: usize) -> f64 {
    bucket as f64 / 10.0
}

/// One tier's fact table: a 101-bucket accumulator column per genre, in
/// ranked genre order.
#[derive(Debug, Clone, PartialEq)]
pub struct FactTable {
    genres: Vec<String>,
    columns: Vec<[f64; SCORE_BUCKETS]>,
}

/// One tidy row of a fact table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactRow<'a> {
    pub score: f64,
    pub genre: &'a str,
    pub count: f64,
}

impl FactTable {
    fn zeroed(genres: Vec<String>) -> Self {
        let columns = vec![[0.0; SCORE_BUCKETS]; genres.len()];
        Self { genres, columns }
    }

    /// Genres in table order; this order is the tie-break for stacking.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn count(&self, genre: &str, bucket: usize) -> f64 {
        self.genres
            .iter()
            .position(|g| g == genre)
            .map_or(0.0, |i| self.columns[i][bucket])
    }

    /// Sum of one genre's column across all buckets.
    pub fn genre_total(&self, genre: &str) -> f64 {
        self.genres
            .iter()
            .position(|g| g == genre)
            .map_or(0.0, |i| self.columns[i].iter().sum())
    }

    /// Sum over the whole table.
    pub fn total(&self) -> f64 {
        self.columns.iter().flatten().sum()
    }

    /// Tidy rows, genre-major in table order, every bucket present.
    pub fn rows(&self) -> impl Iterator<Item = FactRow<'_>> + '_ {
        self.genres.iter().zip(&self.columns).flat_map(|(genre, col)| {
            col.iter().enumerate().map(move |(bucket, &count)| FactRow {
                score: bucket_score(bucket),
                genre,
                count,
            })
        })
    }
}

/// Both precomputed tier views plus the partition that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct FactTables {
    pub tiers: GenreTiers,
    primary: FactTable,
    secondary: FactTable,
    /// Reviews excluded for an off-grid or out-of-range score
    pub rejected: usize,
}

impl FactTables {
    /// Aggregate reviews into the two tier views.
    ///
    /// Each review spreads one unit of credit across its genres (1/k each).
    /// A review whose score has no valid bucket is rejected whole: counted,
    /// excluded, and never partially credited.
    pub fn build(reviews: &[Review], palette_size: usize) -> Self {
        let ranked = genre_counts(reviews);
        let tiers = GenreTiers::split(&ranked, palette_size);

        // Full-universe accumulation in ranked order
        let universe: Vec<String> = ranked.into_iter().map(|(g, _)| g).collect();
        let index: HashMap<&str, usize> = universe
            .iter()
            .enumerate()
            .map(|(i, g)| (g.as_str(), i))
            .collect();
        let mut columns = vec![[0.0; SCORE_BUCKETS]; universe.len()];
        let mut rejected = 0;
        for review in reviews {
            let Some(bucket) = score_bucket(review.score) else {
                rejected += 1;
                continue;
            };
            let credit = 1.0 / review.genres.len() as f64;
            for genre in &review.genres {
                columns[index[genre.as_str()]][bucket] += credit;
            }
        }
        let column = |genre: &str| columns[index[genre]];

        // Primary view: primary columns plus the condensed "Various" column
        let mut primary_genres = tiers.primary.clone();
        primary_genres.push(VARIOUS.to_string());
        let mut primary = FactTable::zeroed(primary_genres);
        for (i, genre) in tiers.primary.iter().enumerate() {
            primary.columns[i] = column(genre);
        }
        let various = primary.columns.last_mut().expect("has Various column");
        for genre in &tiers.secondary {
            for (bucket, count) in column(genre).iter().enumerate() {
                various[bucket] += count;
            }
        }

        // Secondary view: the long tail by itself
        let mut secondary = FactTable::zeroed(tiers.secondary.clone());
        for (i, genre) in tiers.secondary.iter().enumerate() {
            secondary.columns[i] = column(genre);
        }

        Self {
            tiers,
            primary,
            secondary,
            rejected,
        }
    }

    pub fn table(&self, mode: Mode) -> &FactTable {
        match mode {
            Mode::Primary => &self.primary,
            Mode::Secondary => &self.secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NO_GENRE;
    use chrono::NaiveDate;

    // ==========================================================================
    // FACT TABLE TESTS
    // ==========================================================================
    //
    // The fact table is the single representation every chart renders from.
    // The core invariants: fractional credit totals the review count, and
    // condensing the long tail into "Various" preserves per-score totals.
    // ==========================================================================

    fn review(score: f64, genres: &[&str]) -> Review {
        Review {
            score,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            publish_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            release_year: Some(2020),
            labels: vec![],
            artists: vec![],
            album: String::new(),
            href: String::new(),
            artwork: String::new(),
            bnm: false,
        }
    }

    #[test]
    fn test_score_bucket_grid() {
        assert_eq!(score_bucket(0.0), Some(0));
        assert_eq!(score_bucket(7.5), Some(75));
        assert_eq!(score_bucket(10.0), Some(100));
        assert_eq!(score_bucket(7.55), None);
        assert_eq!(score_bucket(-0.1), None);
        assert_eq!(score_bucket(10.1), None);
    }

    #[test]
    fn test_score_bucket_tolerates_float_representation() {
        // 8.2 is not exactly representable; 82 must still come out
        assert_eq!(score_bucket(8.2), Some(82));
        assert_eq!(score_bucket(0.1 + 0.2), Some(3));
    }

    #[test]
    fn test_fractional_credit_scenario() {
        let reviews = vec![review(7.5, &["Rock", "Pop"]), review(7.5, &["Rock"])];
        let tables = FactTables::build(&reviews, 6);
        let primary = tables.table(Mode::Primary);
        assert_eq!(primary.count("Rock", 75), 1.5);
        assert_eq!(primary.count("Pop", 75), 0.5);
    }

    #[test]
    fn test_table_total_equals_review_count() {
        let reviews = vec![
            review(7.5, &["Rock", "Pop", "Jazz"]),
            review(0.0, &["Folk"]),
            review(10.0, &["Pop", "Jazz"]),
            review(4.3, &[NO_GENRE]),
        ];
        let tables = FactTables::build(&reviews, 3);
        let total = tables.table(Mode::Primary).total();
        assert!((total - reviews.len() as f64).abs() < 1e-9);
    }

    #[test]
    fn test_condensation_preserves_per_score_totals() {
        let reviews = vec![
            review(7.5, &["Rock"]),
            review(7.5, &["Jazz"]),
            review(7.5, &["Folk", "Ambient"]),
            review(2.0, &["Folk"]),
            review(2.0, &["Rock", "Pop"]),
        ];
        // Small palette so Jazz/Folk/Ambient land in the secondary tier
        let tables = FactTables::build(&reviews, 3);
        let primary = tables.table(Mode::Primary);
        let secondary = tables.table(Mode::Secondary);
        for bucket in 0..SCORE_BUCKETS {
            let unconditioned: f64 = primary
                .genres()
                .iter()
                .filter(|g| *g != VARIOUS)
                .map(|g| primary.count(g, bucket))
                .sum::<f64>()
                + secondary
                    .genres()
                    .iter()
                    .map(|g| secondary.count(g, bucket))
                    .sum::<f64>();
            let condensed: f64 = primary
                .genres()
                .iter()
                .map(|g| primary.count(g, bucket))
                .sum();
            assert!(
                (condensed - unconditioned).abs() < 1e-9,
                "bucket {bucket}: condensed {condensed} != unconditioned {unconditioned}"
            );
        }
    }

    #[test]
    fn test_out_of_range_score_rejects_whole_review() {
        let reviews = vec![
            review(11.0, &["Rock", "Pop"]),
            review(7.53, &["Rock"]),
            review(7.5, &["Rock"]),
        ];
        let tables = FactTables::build(&reviews, 6);
        assert_eq!(tables.rejected, 2);
        let primary = tables.table(Mode::Primary);
        assert!((primary.total() - 1.0).abs() < 1e-9);
        // No partial credit leaked into adjacent buckets
        assert_eq!(primary.count("Pop", 100), 0.0);
        assert_eq!(primary.count("Rock", 75), 1.0);
    }

    #[test]
    fn test_zero_cells_present_for_stable_key_set() {
        let reviews = vec![review(7.5, &["Rock"])];
        let tables = FactTables::build(&reviews, 6);
        let rows: Vec<_> = tables.table(Mode::Primary).rows().collect();
        // Rock and Various, all 101 buckets each, zeros included
        assert_eq!(rows.len(), 2 * SCORE_BUCKETS);
        assert!(rows.iter().any(|r| r.genre == "Rock" && r.score == 0.0 && r.count == 0.0));
    }

    #[test]
    fn test_various_column_is_last() {
        let reviews = vec![
            review(5.0, &["Rock"]),
            review(5.0, &["Rock"]),
            review(5.0, &["Pop"]),
            review(6.0, &["Jazz"]),
        ];
        let tables = FactTables::build(&reviews, 3);
        let genres = tables.table(Mode::Primary).genres();
        assert_eq!(genres.last().map(String::as_str), Some(VARIOUS));
        assert_eq!(tables.table(Mode::Primary).count(VARIOUS, 60), 1.0);
    }
}
