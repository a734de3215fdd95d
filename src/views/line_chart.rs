//! Line chart adapter: one label's scores over publication time
//!
//! Consumes `LabelHovered` previews; it holds no selection state of its
//! own, just the series for whatever label was hovered last.

use crate::data::Review;
use chrono::NaiveDate;
use serde::Serialize;
use std::rc::Rc;

/// One point on the score-over-time line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub publish_date: NaiveDate,
    pub score: f64,
    pub album: String,
}

pub struct LineChart {
    reviews: Rc<Vec<Review>>,
    title: String,
    series: Vec<SeriesPoint>,
}

impl LineChart {
    pub fn new(reviews: Rc<Vec<Review>>) -> Self {
        Self {
            reviews,
            title: String::new(),
            series: Vec::new(),
        }
    }

    /// Rebuild the series for a hovered label: its reviews in publication
    /// order. A label with no reviews gets an empty chart, not an error.
    pub fn preview_label(&mut self, label: &str) {
        self.title = label.to_string();
        self.series = self
            .reviews
            .iter()
            .filter(|r| r.labels.iter().any(|l| l == label))
            .map(|r| SeriesPoint {
                publish_date: r.publish_date,
                score: r.score,
                album: r.album.clone(),
            })
            .collect();
        self.series.sort_by(|a, b| a.publish_date.cmp(&b.publish_date));
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // LINE CHART TESTS
    // ==========================================================================

    fn review(score: f64, date: (i32, u32, u32), label: &str, album: &str) -> Review {
        Review {
            score,
            genres: vec!["Rock".to_string()],
            publish_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            release_year: None,
            labels: vec![label.to_string()],
            artists: vec![],
            album: album.to_string(),
            href: String::new(),
            artwork: String::new(),
            bnm: false,
        }
    }

    #[test]
    fn test_series_is_chronological() {
        let reviews = Rc::new(vec![
            review(8.0, (2020, 6, 1), "ACME", "Later"),
            review(6.5, (2018, 2, 1), "ACME", "Earlier"),
            review(7.0, (2019, 9, 9), "Other", "Unrelated"),
        ]);
        let mut chart = LineChart::new(reviews);
        chart.preview_label("ACME");
        assert_eq!(chart.title(), "ACME");
        let albums: Vec<&str> = chart.series().iter().map(|p| p.album.as_str()).collect();
        assert_eq!(albums, ["Earlier", "Later"]);
    }

    #[test]
    fn test_unknown_label_yields_empty_series() {
        let reviews = Rc::new(vec![review(8.0, (2020, 6, 1), "ACME", "Album")]);
        let mut chart = LineChart::new(reviews);
        chart.preview_label("Nobody");
        assert_eq!(chart.title(), "Nobody");
        assert!(chart.series().is_empty());
    }

    #[test]
    fn test_rehover_replaces_series() {
        let reviews = Rc::new(vec![
            review(8.0, (2020, 6, 1), "ACME", "A"),
            review(5.0, (2021, 1, 1), "Other", "B"),
        ]);
        let mut chart = LineChart::new(reviews);
        chart.preview_label("ACME");
        chart.preview_label("Other");
        assert_eq!(chart.series().len(), 1);
        assert_eq!(chart.series()[0].album, "B");
    }
}
