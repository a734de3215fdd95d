//! Fixed color palettes and the cached genre color scale
//!
//! Six colors per theme: five for the primary genres plus one for the
//! condensed "Various" bucket. The palettes are the ColorBrewer 6-class
//! qualitative schemes; switching theme swaps the range without touching the
//! aggregated data.

use serde::Serialize;

/// How many distinct genre colors a view may use. Genre tiering condenses
/// the long tail so the legend never exceeds this.
pub const PALETTE_SIZE: usize = 6;

/// ColorBrewer Set2, for the light page theme.
pub const LIGHT6: [&str; PALETTE_SIZE] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f",
];

/// ColorBrewer Dark2, for the dark page theme.
pub const DARK6: [&str; PALETTE_SIZE] = [
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02",
];

/// Color for a genre that is not in the current scale domain. Only reachable
/// through inconsistent inputs; data never carries more genres per tier than
/// the palette holds.
const FALLBACK: &str = "#999999";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn palette(self) -> [&'static str; PALETTE_SIZE] {
        match self {
            Theme::Light => LIGHT6,
            Theme::Dark => DARK6,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Ordinal genre → color assignment for one view.
///
/// Built once per (tier, theme) pair and cached by the owning view; render
/// paths only ever look colors up, they never rebuild the scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: Vec<String>,
    range: [&'static str; PALETTE_SIZE],
}

impl ColorScale {
    pub fn new(domain: Vec<String>, theme: Theme) -> Self {
        Self {
            domain,
            range: theme.palette(),
        }
    }

    pub fn color(&self, genre: &str) -> &'static str {
        match self.domain.iter().position(|g| g == genre) {
            Some(i) => self.range[i % PALETTE_SIZE],
            None => FALLBACK,
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}
