//! Album list adapter: the reviews behind a clicked segment or label
//!
//! Consumes both commit events: `SegmentSelected` shows the reviews inside
//! one histogram cell, `LabelSelected` shows a record label's catalog.

use crate::aggregate::{score_bucket, FactTables, VARIOUS};
use crate::data::Review;
use chrono::NaiveDate;
use serde::Serialize;
use std::rc::Rc;

/// One display row; everything the list panel renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumRow {
    pub artists: Vec<String>,
    pub album: String,
    pub score: f64,
    pub publish_date: NaiveDate,
    pub bnm: bool,
    pub href: String,
    pub artwork: String,
}

impl AlbumRow {
    fn from_review(review: &Review) -> Self {
        Self {
            artists: review.artists.clone(),
            album: review.album.clone(),
            score: review.score,
            publish_date: review.publish_date,
            bnm: review.bnm,
            href: review.href.clone(),
            artwork: review.artwork.clone(),
        }
    }
}

pub struct AlbumList {
    reviews: Rc<Vec<Review>>,
    facts: Rc<FactTables>,
    title: String,
    rows: Vec<AlbumRow>,
}

impl AlbumList {
    pub fn new(reviews: Rc<Vec<Review>>, facts: Rc<FactTables>) -> Self {
        Self {
            reviews,
            facts,
            title: String::new(),
            rows: Vec::new(),
        }
    }

    /// Reviews inside one histogram cell. A "Various" segment matches any
    /// review carrying a secondary-tier genre at that score, the same
    /// reviews the condensed column counted.
    pub fn show_segment(&mut self, genre: &str, score: f64) {
        self.title = format!("{genre}, {score:.1}");
        let Some(bucket) = score_bucket(score) else {
            self.rows = Vec::new();
            return;
        };
        let tiers = self.facts.tiers.clone();
        let matches = |review: &Review| {
            if score_bucket(review.score) != Some(bucket) {
                return false;
            }
            if genre == VARIOUS {
                review
                    .genres
                    .iter()
                    .any(|g| tiers.secondary.iter().any(|s| s == g))
            } else {
                review.genres.iter().any(|g| g == genre)
            }
        };
        self.set_rows(matches);
    }

    /// A record label's reviewed albums.
    pub fn show_label(&mut self, label: &str) {
        self.title = label.to_string();
        self.set_rows(|review: &Review| review.labels.iter().any(|l| l == label));
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[AlbumRow] {
        &self.rows
    }

    fn set_rows(&mut self, matches: impl Fn(&Review) -> bool) {
        self.rows = self
            .reviews
            .iter()
            .filter(|r| matches(r))
            .map(AlbumRow::from_review)
            .collect();
        // Newest first
        self.rows
            .sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    }
}
