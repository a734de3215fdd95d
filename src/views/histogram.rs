//! Stacked histogram adapter: review counts per score, layered by genre

use crate::aggregate::{stacked_layout, BarSegment, FactTables};
use crate::bus::{DashboardEvent, EventBus};
use crate::palette::{ColorScale, Theme};
use crate::selection::{route_legend_click, LegendAction, SelectionState};

use super::LegendCell;

/// The histogram's state and cached scale. All data access goes through the
/// precomputed fact tables; raw reviews are never read here.
pub struct Histogram {
    state: SelectionState,
    facts: std::rc::Rc<FactTables>,
    bus: std::rc::Rc<EventBus>,
    theme: Theme,
    // Rebuilt only when tier or theme changes, never per render
    scale: ColorScale,
}

impl Histogram {
    pub fn new(
        facts: std::rc::Rc<FactTables>,
        bus: std::rc::Rc<EventBus>,
        theme: Theme,
    ) -> Self {
        let state = SelectionState::new();
        let scale = ColorScale::new(facts.tiers.legend(state.mode), theme);
        Self {
            state,
            facts,
            bus,
            theme,
            scale,
        }
    }

    /// Draw-ready stacked bars for the current visible subset. Pure in the
    /// state: same state, same segments.
    pub fn layout(&self) -> Vec<BarSegment> {
        stacked_layout(&self.state.visible_subset(&self.facts))
    }

    /// Legend cells in palette-slot order, with local filter marks.
    pub fn legend(&self) -> Vec<LegendCell> {
        self.scale
            .domain()
            .iter()
            .map(|genre| LegendCell {
                genre: genre.clone(),
                color: self.scale.color(genre).to_string(),
                selected: self.state.selected_genres.contains(genre),
            })
            .collect()
    }

    /// Bar-segment click: toggles the active segment locally and broadcasts
    /// the selection for the album list. This is the histogram's only
    /// cross-view emission; legend clicks stay local.
    pub fn segment_click(&mut self, genre: &str, bucket: usize) {
        self.state = self.state.set_active_segment(genre, bucket);
        self.bus.emit(DashboardEvent::SegmentSelected {
            genre: genre.to_string(),
            score: crate::aggregate::bucket_score(bucket),
        });
    }

    /// Legend-cell click: sentinel cells switch tiers, everything else
    /// toggles the local filter. Only the tier switch invalidates the scale.
    pub fn legend_click(&mut self, genre: &str) {
        match route_legend_click(genre) {
            LegendAction::SwitchMode(mode) => {
                self.state = self.state.set_mode(mode, &self.facts.tiers);
                self.rebuild_scale();
            }
            LegendAction::ToggleFilter => {
                self.state = self.state.toggle_genre(genre);
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.rebuild_scale();
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    fn rebuild_scale(&mut self) {
        self.scale = ColorScale::new(self.facts.tiers.legend(self.state.mode), self.theme);
    }
}
