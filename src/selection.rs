//! Per-view selection state machine
//!
//! Each chart owns one [`SelectionState`]: which genre tier it shows, which
//! genres the legend has filtered down to, and the last-clicked bar segment.
//! Transitions are pure functions from (state, input) to new state, so the
//! render layer
//! can re-derive its visible subset from state alone and redrawing is always
//! a no-op when nothing changed. The histogram's and the scatter plot's
//! states are independent even though both come from the same dataset.
//!
//! Legend clicks are routed before the genre toggle runs: the two sentinel
//! strings look like ordinary genre labels but mean "switch tier", so
//! [`route_legend_click`] must be consulted first.

use crate::aggregate::facts::{bucket_score, FactRow, FactTables};
use crate::aggregate::tiering::{is_sentinel, GenreTiers, RETURN_TO_PRIMARY, VARIOUS};
use serde::Serialize;
use std::collections::BTreeSet;

/// Which genre tier a view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Primary,
    Secondary,
}

/// The last-clicked histogram cell, identified by genre and score bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub genre: String,
    pub bucket: usize,
}

impl Segment {
    pub fn score(&self) -> f64 {
        bucket_score(self.bucket)
    }
}

/// What a legend-cell click means once sentinels are taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendAction {
    /// Ordinary genre: toggle it in the local filter
    ToggleFilter,
    /// Sentinel: switch the view into this tier
    SwitchMode(Mode),
}

/// Sentinels first, filter toggle second. The sentinel check must win: the
/// sentinel strings are syntactically indistinguishable from genre labels.
pub fn route_legend_click(genre: &str) -> LegendAction {
    match genre {
        VARIOUS => LegendAction::SwitchMode(Mode::Secondary),
        RETURN_TO_PRIMARY => LegendAction::SwitchMode(Mode::Primary),
        _ => LegendAction::ToggleFilter,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionState {
    pub mode: Mode,
    /// Empty means "no filter, show all", not "show nothing"
    pub selected_genres: BTreeSet<String>,
    pub active_segment: Option<Segment>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Primary,
            selected_genres: BTreeSet::new(),
            active_segment: None,
        }
    }

    /// Toggle a genre in the filter set. Sentinels are a content no-op;
    /// they should have been routed to [`SelectionState::set_mode`] by
    /// [`route_legend_click`] before this runs.
    #[must_use]
    pub fn toggle_genre(&self, genre: &str) -> Self {
        let mut next = self.clone();
        if is_sentinel(genre) {
            return next;
        }
        if !next.selected_genres.remove(genre) {
            next.selected_genres.insert(genre.to_string());
        }
        next
    }

    /// Switch tier. Always clears the genre filter; a filter built against
    /// one tier's genre set is meaningless in the other. The active segment
    /// survives only if its genre still resolves in the new tier.
    #[must_use]
    pub fn set_mode(&self, mode: Mode, tiers: &GenreTiers) -> Self {
        let active_segment = self
            .active_segment
            .clone()
            .filter(|seg| tiers.resolves(mode, &seg.genre));
        Self {
            mode,
            selected_genres: BTreeSet::new(),
            active_segment,
        }
    }

    /// Mark a segment active, or clear it when the same segment is clicked
    /// again (deselect-on-reclick).
    #[must_use]
    pub fn set_active_segment(&self, genre: &str, bucket: usize) -> Self {
        let clicked = Segment {
            genre: genre.to_string(),
            bucket,
        };
        let mut next = self.clone();
        next.active_segment = match &self.active_segment {
            Some(current) if *current == clicked => None,
            _ => Some(clicked),
        };
        next
    }

    /// The current tier's fact rows, filtered to the selected genres when
    /// any are selected. Zero visible rows is a valid result, not an error.
    pub fn visible_subset<'a>(&self, tables: &'a FactTables) -> Vec<FactRow<'a>> {
        tables
            .table(self.mode)
            .rows()
            .filter(|row| {
                self.selected_genres.is_empty() || self.selected_genres.contains(row.genre)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Review;
    use chrono::NaiveDate;

    // ==========================================================================
    // STATE TRANSITION TESTS
    // ==========================================================================
    //
    // All transitions are pure; each test checks the returned state and that
    // the input state is untouched.
    // ==========================================================================

    fn review(score: f64, genres: &[&str]) -> Review {
        Review {
            score,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            publish_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            release_year: None,
            labels: vec![],
            artists: vec![],
            album: String::new(),
            href: String::new(),
            artwork: String::new(),
            bnm: false,
        }
    }

    /// Rock/Pop primary, Jazz/Folk secondary under palette size 3.
    fn tables() -> FactTables {
        let reviews = vec![
            review(7.5, &["Rock"]),
            review(7.5, &["Rock"]),
            review(7.5, &["Rock"]),
            review(6.0, &["Pop"]),
            review(6.0, &["Pop"]),
            review(6.5, &["Pop"]),
            review(4.0, &["Jazz"]),
            review(4.0, &["Jazz"]),
            review(2.0, &["Folk"]),
        ];
        FactTables::build(&reviews, 3)
    }

    #[test]
    fn test_initial_state() {
        let state = SelectionState::new();
        assert_eq!(state.mode, Mode::Primary);
        assert!(state.selected_genres.is_empty());
        assert!(state.active_segment.is_none());
    }

    #[test]
    fn test_toggle_genre_is_its_own_inverse() {
        let state = SelectionState::new();
        let toggled = state.toggle_genre("Rock");
        assert!(toggled.selected_genres.contains("Rock"));
        let back = toggled.toggle_genre("Rock");
        assert_eq!(back.selected_genres, state.selected_genres);
    }

    #[test]
    fn test_toggle_genre_does_not_mutate_input() {
        let state = SelectionState::new();
        let _ = state.toggle_genre("Rock");
        assert!(state.selected_genres.is_empty());
    }

    #[test]
    fn test_toggle_sentinel_is_content_noop() {
        let state = SelectionState::new().toggle_genre("Rock");
        let after = state.toggle_genre(VARIOUS).toggle_genre(RETURN_TO_PRIMARY);
        assert_eq!(after, state);
    }

    #[test]
    fn test_set_mode_always_clears_selection() {
        let tables = tables();
        let state = SelectionState::new()
            .toggle_genre("Rock")
            .toggle_genre("Pop")
            .set_mode(Mode::Secondary, &tables.tiers);
        assert!(state.selected_genres.is_empty());

        // Back and forth with intermediate toggles still ends empty
        let state = state
            .toggle_genre("Jazz")
            .set_mode(Mode::Primary, &tables.tiers);
        assert_eq!(state.mode, Mode::Primary);
        assert!(state.selected_genres.is_empty());
    }

    #[test]
    fn test_active_segment_toggles_off_on_reclick() {
        let state = SelectionState::new().set_active_segment("Rock", 75);
        assert_eq!(
            state.active_segment,
            Some(Segment {
                genre: "Rock".to_string(),
                bucket: 75
            })
        );
        let cleared = state.set_active_segment("Rock", 75);
        assert!(cleared.active_segment.is_none());
    }

    #[test]
    fn test_active_segment_replaced_by_different_click() {
        let state = SelectionState::new()
            .set_active_segment("Rock", 75)
            .set_active_segment("Pop", 60);
        assert_eq!(state.active_segment.unwrap().genre, "Pop");
    }

    #[test]
    fn test_active_segment_cleared_when_unresolvable_in_new_tier() {
        let tables = tables();
        // Rock does not exist in the secondary tier
        let state = SelectionState::new()
            .set_active_segment("Rock", 75)
            .set_mode(Mode::Secondary, &tables.tiers);
        assert!(state.active_segment.is_none());
    }

    #[test]
    fn test_active_segment_kept_when_it_resolves() {
        let tables = tables();
        let state = SelectionState::new()
            .set_mode(Mode::Secondary, &tables.tiers)
            .set_active_segment("Jazz", 40)
            .set_mode(Mode::Secondary, &tables.tiers);
        assert_eq!(state.active_segment.unwrap().genre, "Jazz");
    }

    #[test]
    fn test_empty_selection_shows_whole_tier() {
        let tables = tables();
        let state = SelectionState::new();
        let rows = state.visible_subset(&tables);
        // Rock, Pop and Various: the full primary table
        let genres: BTreeSet<&str> = rows.iter().map(|r| r.genre).collect();
        assert_eq!(genres, BTreeSet::from(["Rock", "Pop", VARIOUS]));
    }

    #[test]
    fn test_selection_filters_rows() {
        let tables = tables();
        let state = SelectionState::new().toggle_genre("Rock");
        let rows = state.visible_subset(&tables);
        assert!(rows.iter().all(|r| r.genre == "Rock"));
        assert!(!rows.is_empty());
    }

    #[test]
    fn test_filter_with_no_matches_yields_empty_not_error() {
        let tables = tables();
        // Jazz is not in the primary tier, so nothing matches
        let state = SelectionState::new().toggle_genre("Jazz");
        assert!(state.visible_subset(&tables).is_empty());
    }

    #[test]
    fn test_legend_routing_checks_sentinels_first() {
        assert_eq!(
            route_legend_click(VARIOUS),
            LegendAction::SwitchMode(Mode::Secondary)
        );
        assert_eq!(
            route_legend_click(RETURN_TO_PRIMARY),
            LegendAction::SwitchMode(Mode::Primary)
        );
        assert_eq!(route_legend_click("Rock"), LegendAction::ToggleFilter);
    }
}
