//! Presentation adapters and dashboard wiring
//!
//! Each chart is a thin adapter: it owns its selection state and cached
//! color scale, derives draw-ready records from the precomputed aggregate
//! tables, and turns user gestures into state transitions plus bus events.
//! Adapters never touch raw records beyond the prepared inputs they are
//! constructed with.
//!
//! [`Dashboard`] is the explicit application context: it is built once from
//! the loaded sources and handed around by reference; there is no ambient
//! module state. A source file that failed to load leaves its views absent
//! and its error message recorded; the remaining views still work.

pub mod album_list;
pub mod histogram;
pub mod line_chart;
pub mod scatter;

pub use album_list::{AlbumList, AlbumRow};
pub use histogram::Histogram;
pub use line_chart::{LineChart, SeriesPoint};
pub use scatter::ScatterPlot;

use crate::aggregate::{score_bucket, FactTables, LabelTiers};
use crate::bus::{DashboardEvent, EventBus, EventKind};
use crate::data::{Review, Sources};
use crate::palette::{Theme, PALETTE_SIZE};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// One clickable legend entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendCell {
    pub genre: String,
    pub color: String,
    /// Whether the genre is in the view's local filter
    pub selected: bool,
}

/// A user gesture, as reported by the render layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Histogram bar-segment click
    SegmentClick { genre: String, score: f64 },
    /// Histogram legend-cell click (local filter or tier switch)
    HistogramLegendClick { genre: String },
    /// Scatter legend-cell click
    ScatterLegendClick { genre: String },
    /// Scatter point click
    PointClick { label: String },
    /// Scatter point hover
    PointHover { label: String },
    /// Dark-mode toggle; swaps palettes without re-aggregating
    ThemeToggle,
}

/// Load errors, kept per source so the page can show one broken panel
/// instead of failing whole.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceErrors {
    pub reviews: Option<String>,
    pub labels: Option<String>,
    pub end_date: Option<String>,
}

/// The whole dashboard: every view plus the bus that links them.
pub struct Dashboard {
    pub bus: Rc<EventBus>,
    pub theme: Theme,
    pub histogram: Option<Histogram>,
    pub scatter: Option<ScatterPlot>,
    pub line_chart: Option<Rc<RefCell<LineChart>>>,
    pub album_list: Option<Rc<RefCell<AlbumList>>>,
    pub errors: SourceErrors,
    pub end_date: Option<String>,
    pub review_count: usize,
    pub rejected_reviews: usize,
    pub label_count: usize,
    pub rejected_labels: usize,
}

impl Dashboard {
    /// Wire up whatever loaded. The review-backed views (histogram, line
    /// chart, album list) and the label-backed scatter plot come up
    /// independently; cross-view subscriptions are registered here, once.
    pub fn new(sources: Sources, count_cutoff: u32) -> Self {
        let bus = Rc::new(EventBus::new());
        let theme = Theme::Dark;
        let mut errors = SourceErrors::default();

        let mut histogram = None;
        let mut line_chart = None;
        let mut album_list = None;
        let mut review_count = 0;
        let mut rejected_reviews = 0;
        match sources.reviews {
            Ok(loaded) => {
                rejected_reviews = loaded.rejected;
                let reviews: Rc<Vec<Review>> = Rc::new(loaded.records);
                review_count = reviews.len();
                let facts = Rc::new(FactTables::build(&reviews, PALETTE_SIZE));
                rejected_reviews += facts.rejected;

                histogram = Some(Histogram::new(
                    Rc::clone(&facts),
                    Rc::clone(&bus),
                    theme,
                ));

                let line = Rc::new(RefCell::new(LineChart::new(Rc::clone(&reviews))));
                let sink = Rc::clone(&line);
                bus.subscribe(EventKind::LabelHovered, move |event| {
                    if let DashboardEvent::LabelHovered { label } = event {
                        sink.borrow_mut().preview_label(label);
                    }
                });
                line_chart = Some(line);

                let list = Rc::new(RefCell::new(AlbumList::new(
                    Rc::clone(&reviews),
                    Rc::clone(&facts),
                )));
                let sink = Rc::clone(&list);
                bus.subscribe(EventKind::SegmentSelected, move |event| {
                    if let DashboardEvent::SegmentSelected { genre, score } = event {
                        sink.borrow_mut().show_segment(genre, *score);
                    }
                });
                let sink = Rc::clone(&list);
                bus.subscribe(EventKind::LabelSelected, move |event| {
                    if let DashboardEvent::LabelSelected { label } = event {
                        sink.borrow_mut().show_label(label);
                    }
                });
                album_list = Some(list);
            }
            Err(e) => errors.reviews = Some(e.to_string()),
        }

        let mut scatter = None;
        let mut label_count = 0;
        let mut rejected_labels = 0;
        match sources.labels {
            Ok(loaded) => {
                rejected_labels = loaded.rejected;
                label_count = loaded.records.len();
                let tiers = Rc::new(LabelTiers::build(
                    &loaded.records,
                    count_cutoff,
                    PALETTE_SIZE,
                ));
                scatter = Some(ScatterPlot::new(tiers, Rc::clone(&bus), theme));
            }
            Err(e) => errors.labels = Some(e.to_string()),
        }

        let end_date = match sources.end_date {
            Ok(text) => Some(text),
            Err(e) => {
                errors.end_date = Some(e.to_string());
                None
            }
        };

        Self {
            bus,
            theme,
            histogram,
            scatter,
            line_chart,
            album_list,
            errors,
            end_date,
            review_count,
            rejected_reviews,
            label_count,
            rejected_labels,
        }
    }

    /// Route one gesture to its view. Unroutable gestures (a view that
    /// failed to load, a score off the grid) report why instead of being
    /// silently dropped.
    pub fn apply_gesture(&mut self, gesture: Gesture) -> Result<(), String> {
        match gesture {
            Gesture::SegmentClick { genre, score } => {
                let bucket =
                    score_bucket(score).ok_or_else(|| format!("score {score} off the 0.1 grid"))?;
                self.histogram
                    .as_mut()
                    .ok_or("histogram unavailable")?
                    .segment_click(&genre, bucket);
            }
            Gesture::HistogramLegendClick { genre } => {
                self.histogram
                    .as_mut()
                    .ok_or("histogram unavailable")?
                    .legend_click(&genre);
            }
            Gesture::ScatterLegendClick { genre } => {
                self.scatter
                    .as_mut()
                    .ok_or("scatter plot unavailable")?
                    .legend_click(&genre);
            }
            Gesture::PointClick { label } => {
                self.scatter
                    .as_ref()
                    .ok_or("scatter plot unavailable")?
                    .point_click(&label);
            }
            Gesture::PointHover { label } => {
                self.scatter
                    .as_ref()
                    .ok_or("scatter plot unavailable")?
                    .point_hover(&label);
            }
            Gesture::ThemeToggle => self.toggle_theme(),
        }
        Ok(())
    }

    /// Swap palettes on every view. Aggregates are untouched; only the
    /// cached color scales rebuild.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Some(h) = self.histogram.as_mut() {
            h.set_theme(self.theme);
        }
        if let Some(s) = self.scatter.as_mut() {
            s.set_theme(self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LabelStat, Loaded};
    use chrono::NaiveDate;

    // ==========================================================================
    // DASHBOARD WIRING TESTS
    // ==========================================================================
    //
    // End-to-end over the in-process pipeline: gestures in, linked-panel
    // updates out, with no view talking to another except through the bus.
    // ==========================================================================

    fn review(score: f64, genres: &[&str], label: &str, album: &str) -> Review {
        Review {
            score,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            publish_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            release_year: Some(2020),
            labels: vec![label.to_string()],
            artists: vec!["Artist".to_string()],
            album: album.to_string(),
            href: String::new(),
            artwork: String::new(),
            bnm: false,
        }
    }

    fn label(name: &str, count: u32, genre: &str) -> LabelStat {
        LabelStat {
            label: name.to_string(),
            count,
            mean: 7.0,
            median: 7.0,
            std_dev: 0.8,
            majority_genre: genre.to_string(),
        }
    }

    fn sources() -> Sources {
        Sources {
            reviews: Ok(Loaded {
                records: vec![
                    review(7.5, &["Rock"], "ACME", "First"),
                    review(8.0, &["Rock"], "ACME", "Second"),
                    review(5.0, &["Pop"], "Other", "Third"),
                ],
                rejected: 0,
            }),
            labels: Ok(Loaded {
                records: vec![label("ACME", 12, "Rock"), label("Other", 8, "Pop")],
                rejected: 0,
            }),
            end_date: Ok("March 2021".to_string()),
        }
    }

    #[test]
    fn test_segment_click_fills_album_list() {
        let mut dash = Dashboard::new(sources(), 5);
        dash.apply_gesture(Gesture::SegmentClick {
            genre: "Rock".to_string(),
            score: 7.5,
        })
        .unwrap();
        let list = dash.album_list.as_ref().unwrap().borrow();
        assert_eq!(list.rows().len(), 1);
        assert_eq!(list.rows()[0].album, "First");
    }

    #[test]
    fn test_hover_previews_line_chart_without_touching_album_list() {
        let mut dash = Dashboard::new(sources(), 5);
        dash.apply_gesture(Gesture::PointHover {
            label: "ACME".to_string(),
        })
        .unwrap();

        let line = dash.line_chart.as_ref().unwrap().borrow();
        assert_eq!(line.title(), "ACME");
        assert_eq!(line.series().len(), 2);
        drop(line);

        let list = dash.album_list.as_ref().unwrap().borrow();
        assert!(list.rows().is_empty(), "hover must not commit the list");
    }

    #[test]
    fn test_click_after_hover_commits_album_list() {
        let mut dash = Dashboard::new(sources(), 5);
        dash.apply_gesture(Gesture::PointHover {
            label: "ACME".to_string(),
        })
        .unwrap();
        dash.apply_gesture(Gesture::PointClick {
            label: "ACME".to_string(),
        })
        .unwrap();
        let list = dash.album_list.as_ref().unwrap().borrow();
        assert_eq!(list.title(), "ACME");
        assert_eq!(list.rows().len(), 2);
    }

    #[test]
    fn test_off_grid_score_is_rejected() {
        let mut dash = Dashboard::new(sources(), 5);
        let err = dash.apply_gesture(Gesture::SegmentClick {
            genre: "Rock".to_string(),
            score: 7.53,
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_broken_labels_file_still_builds_histogram() {
        let mut sources = sources();
        sources.labels = Err(crate::error::LoadError::Io {
            path: "labels.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        let dash = Dashboard::new(sources, 5);
        assert!(dash.histogram.is_some());
        assert!(dash.scatter.is_none());
        assert!(dash.errors.labels.is_some());
        assert!(dash.errors.reviews.is_none());
    }

    #[test]
    fn test_theme_toggle_swaps_palette_everywhere() {
        let mut dash = Dashboard::new(sources(), 5);
        let before = dash.histogram.as_ref().unwrap().legend()[0].color.clone();
        dash.apply_gesture(Gesture::ThemeToggle).unwrap();
        assert_eq!(dash.theme, Theme::Light);
        let after = dash.histogram.as_ref().unwrap().legend()[0].color.clone();
        assert_ne!(before, after);
    }

    #[test]
    fn test_histogram_and_scatter_filters_are_independent() {
        let mut dash = Dashboard::new(sources(), 5);
        dash.apply_gesture(Gesture::HistogramLegendClick {
            genre: "Rock".to_string(),
        })
        .unwrap();
        let histogram_state = dash.histogram.as_ref().unwrap().state();
        let scatter_state = dash.scatter.as_ref().unwrap().state();
        assert!(histogram_state.selected_genres.contains("Rock"));
        assert!(scatter_state.selected_genres.is_empty());
    }
}
