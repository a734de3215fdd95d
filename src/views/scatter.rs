//! Scatter plot adapter: one circle per record label, mean vs. deviation

use crate::aggregate::{scatter_points, LabelTiers, ScatterPoint};
use crate::bus::{DashboardEvent, EventBus};
use crate::data::LabelStat;
use crate::palette::{ColorScale, Theme};
use crate::selection::{route_legend_click, LegendAction, SelectionState};
use std::rc::Rc;

use super::LegendCell;

/// Independent of the histogram: its own state machine, its own tiers
/// (labels tier by majority genre, not review genres).
pub struct ScatterPlot {
    state: SelectionState,
    labels: Rc<LabelTiers>,
    bus: Rc<EventBus>,
    theme: Theme,
    scale: ColorScale,
}

impl ScatterPlot {
    pub fn new(labels: Rc<LabelTiers>, bus: Rc<EventBus>, theme: Theme) -> Self {
        let state = SelectionState::new();
        let scale = ColorScale::new(labels.tiers.legend(state.mode), theme);
        Self {
            state,
            labels,
            bus,
            theme,
            scale,
        }
    }

    /// Draw-ready circles for the current tier and filter, count-descending
    /// so small circles land on top.
    pub fn points(&self) -> Vec<ScatterPoint> {
        let visible: Vec<LabelStat> = self
            .labels
            .visible(self.state.mode)
            .iter()
            .filter(|l| {
                self.state.selected_genres.is_empty()
                    || self.state.selected_genres.contains(&l.majority_genre)
            })
            .cloned()
            .collect();
        scatter_points(&visible, &self.scale)
    }

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

    /// Point click: commit. Broadcast only; selection state is the
    /// consumers' concern.
    pub fn point_click(&self, label: &str) {
        self.bus.emit(DashboardEvent::LabelSelected {
            label: label.to_string(),
        });
    }

    /// Point hover: preview. Never emits the selected event.
    pub fn point_hover(&self, label: &str) {
        self.bus.emit(DashboardEvent::LabelHovered {
            label: label.to_string(),
        });
    }

    pub fn legend_click(&mut self, genre: &str) {
        match route_legend_click(genre) {
            LegendAction::SwitchMode(mode) => {
                self.state = self.state.set_mode(mode, &self.labels.tiers);
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
        self.scale = ColorScale::new(self.labels.tiers.legend(self.state.mode), self.theme);
    }
}
