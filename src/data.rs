//! Dataset records and static-file loading
//!
//! The dashboard runs over three static files in a data directory:
//!
//! - `reviews.json`: one record per album review
//! - `labels.json`: one precomputed aggregate per record label
//! - `end_date.txt`: plain text shown verbatim in the status line
//!
//! The upstream export serializes every numeric field as a string, so
//! `score`, `count`, `mean`, `median` and `std_dev` are parsed here at load
//! time. A record whose required numeric field fails to parse is dropped and
//! counted; the rest of the file still loads. Reviews with no genres are
//! normalized to the [`NO_GENRE`] sentinel so every review participates in
//! the genre aggregation.
//!
//! `reviews.json` and `labels.json` are read concurrently with a join
//! barrier; callers only construct views once both sides have settled.

use crate::error::LoadError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Genre recorded for reviews that specify none.
pub const NO_GENRE: &str = "No genre specified";

/// One album review. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    /// Review score in [0, 10], quantized to tenths upstream
    pub score: f64,
    /// Ordered genre tags; never empty after loading (see [`NO_GENRE`])
    pub genres: Vec<String>,
    pub publish_date: NaiveDate,
    pub release_year: Option<i32>,
    /// Record labels that released the album; links reviews to label marks
    pub labels: Vec<String>,
    pub artists: Vec<String>,
    pub album: String,
    pub href: String,
    pub artwork: String,
    /// "Best New Music" flag
    pub bnm: bool,
}

/// Precomputed per-label statistics. The mean/median/std_dev values are
/// taken as given from the source file, never re-derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStat {
    pub label: String,
    /// Number of reviews behind the aggregate
    pub count: u32,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Most common genre among the label's reviews, used for coloring
    pub majority_genre: String,
}

/// Outcome of loading one source file: the surviving records plus how many
/// were dropped for failing per-record validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub rejected: usize,
}

/// Per-source results of a dataset load. Each view only needs its own
/// source, so one broken file degrades one view instead of the whole page.
#[derive(Debug)]
pub struct Sources {
    pub reviews: Result<Loaded<Review>, LoadError>,
    pub labels: Result<Loaded<LabelStat>, LoadError>,
    pub end_date: Result<String, LoadError>,
}

/// A JSON field that should be numeric but usually arrives as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumField {
    Num(f64),
    Text(String),
}

impl NumField {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumField::Num(n) => Some(*n),
            NumField::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Permissive wire shape for a review; validation happens in `validate`.
#[derive(Debug, Deserialize)]
struct RawReview {
    score: Option<NumField>,
    #[serde(default)]
    genres: Vec<String>,
    publish_date: Option<String>,
    release_year: Option<NumField>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    artists: Vec<String>,
    #[serde(default)]
    album: String,
    #[serde(default)]
    href: String,
    #[serde(default)]
    artwork: String,
    #[serde(default)]
    bnm: bool,
}

impl RawReview {
    fn validate(self) -> Option<Review> {
        let score = self.score.as_ref()?.as_f64()?;
        if !score.is_finite() {
            return None;
        }
        let publish_date = parse_date(self.publish_date.as_deref()?)?;
        let mut genres = self.genres;
        if genres.is_empty() {
            genres.push(NO_GENRE.to_string());
        }
        Some(Review {
            score,
            genres,
            publish_date,
            release_year: self.release_year.and_then(|y| y.as_f64()).map(|y| y as i32),
            labels: self.labels,
            artists: self.artists,
            album: self.album,
            href: self.href,
            artwork: self.artwork,
            bnm: self.bnm,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawLabelStat {
    label: Option<String>,
    count: Option<NumField>,
    mean: Option<NumField>,
    median: Option<NumField>,
    std_dev: Option<NumField>,
    #[serde(default)]
    majority_genre: String,
}

impl RawLabelStat {
    fn validate(self) -> Option<LabelStat> {
        let count = self.count.as_ref()?.as_f64()?;
        if count < 0.0 || count.fract() != 0.0 {
            return None;
        }
        let mean = self.mean.as_ref()?.as_f64()?;
        let median = self.median.as_ref()?.as_f64()?;
        let std_dev = self.std_dev.as_ref()?.as_f64()?;
        if !(mean.is_finite() && median.is_finite() && std_dev.is_finite()) {
            return None;
        }
        Some(LabelStat {
            label: self.label?,
            count: count as u32,
            mean,
            median,
            std_dev,
            majority_genre: self.majority_genre,
        })
    }
}

/// The export writes ISO dates; older snapshots used long month names.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for format in ["%Y-%m-%d", "%B %d %Y", "%b %d %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

/// Load and validate `reviews.json`.
pub fn load_reviews(path: &Path) -> Result<Loaded<Review>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let raw: Vec<RawReview> =
        serde_json::from_str(&text).map_err(|e| LoadError::json(path, e))?;
    Ok(keep_valid(raw, RawReview::validate))
}

/// Load and validate `labels.json`.
pub fn load_labels(path: &Path) -> Result<Loaded<LabelStat>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let raw: Vec<RawLabelStat> =
        serde_json::from_str(&text).map_err(|e| LoadError::json(path, e))?;
    Ok(keep_valid(raw, RawLabelStat::validate))
}

/// Load `end_date.txt`; the content is displayed verbatim, only trimmed.
pub fn load_end_date(path: &Path) -> Result<String, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    Ok(text.trim().to_string())
}

fn keep_valid<R, T>(raw: Vec<R>, validate: impl Fn(R) -> Option<T>) -> Loaded<T> {
    let total = raw.len();
    let records: Vec<T> = raw.into_iter().filter_map(validate).collect();
    let rejected = total - records.len();
    Loaded { records, rejected }
}

/// Load the three source files from a data directory.
///
/// The two JSON files are fetched concurrently; this function is the join
/// barrier the views wait behind. Failures stay per-source.
pub fn load_dir(dir: &Path) -> Sources {
    let (reviews, (labels, end_date)) = rayon::join(
        || load_reviews(&dir.join("reviews.json")),
        || {
            rayon::join(
                || load_labels(&dir.join("labels.json")),
                || load_end_date(&dir.join("end_date.txt")),
            )
        },
    );
    Sources {
        reviews,
        labels,
        end_date,
    }
}
