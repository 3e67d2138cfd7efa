use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use ratatui::style::Color;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::topology::{CountryFeature, WorldTopology};
use crate::countries;
use crate::domain::TrendsResult;
use crate::error::MapError;

pub const NO_DATA_COLOR: Color = Color::Rgb(0xe1, 0xe5, 0xe9);
pub const AVAILABLE_COLOR: Color = Color::Rgb(0x66, 0x7e, 0xea);
pub const SELECTED_COLOR: Color = Color::Rgb(0xff, 0xd7, 0x00);
pub const HIGHLIGHT_COLOR: Color = Color::Rgb(0xff, 0x6b, 0x6b);

/// Bucket boundaries and the palette they index into.
pub const INTENSITY_THRESHOLDS: [u32; 6] = [1, 20, 40, 60, 80, 100];
pub const INTENSITY_PALETTE: [Color; 7] = [
    Color::Rgb(0xe1, 0xe5, 0xe9),
    Color::Rgb(0xc6, 0xdb, 0xef),
    Color::Rgb(0x9e, 0xca, 0xe1),
    Color::Rgb(0x6b, 0xae, 0xd6),
    Color::Rgb(0x42, 0x92, 0xc6),
    Color::Rgb(0x21, 0x71, 0xb5),
    Color::Rgb(0x08, 0x51, 0x9c),
];

pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(2);
const SELECTION_CHANNEL_CAPACITY: usize = 16;

pub fn intensity_color(value: u32) -> Color {
    let bucket = INTENSITY_THRESHOLDS
        .iter()
        .take_while(|threshold| value >= **threshold)
        .count();
    INTENSITY_PALETTE[bucket]
}

/// Polygon colour from availability and the current result.
pub fn fill_color(
    code: Option<&str>,
    available: &HashSet<String>,
    result: Option<&TrendsResult>,
) -> Color {
    let Some(code) = code.filter(|code| available.contains(*code)) else {
        return NO_DATA_COLOR;
    };

    match result.and_then(|result| result.region_value(code)) {
        Some(value) if value > 0 => intensity_color(value),
        _ => AVAILABLE_COLOR,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySelection {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Map not loaded, or the point is not on any country.
    Ignored,
    Unavailable { name: String },
    Selected(CountrySelection),
}

/// Hover data for one country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    pub name: Option<String>,
    pub available: bool,
    pub value: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct Highlight {
    index: usize,
    until: Instant,
}

pub struct ChoroplethMap {
    state: MapState,
    topology: WorldTopology,
    current: Option<Arc<TrendsResult>>,
    available: HashSet<String>,
    colors: Vec<Color>,
    selected: Option<usize>,
    highlight: Option<Highlight>,
    selections: broadcast::Sender<CountrySelection>,
}

impl ChoroplethMap {
    pub fn new() -> Self {
        let (selections, _) = broadcast::channel(SELECTION_CHANNEL_CAPACITY);
        Self {
            state: MapState::Loading,
            topology: WorldTopology::default(),
            current: None,
            available: countries::DEFAULT_AVAILABLE
                .iter()
                .map(|(code, _, _)| (*code).to_string())
                .collect(),
            colors: Vec::new(),
            selected: None,
            highlight: None,
            selections,
        }
    }

    pub const fn state(&self) -> &MapState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == MapState::Ready
    }

    /// Finish the one-time load. Data set while loading is applied now.
    pub fn install(&mut self, topology: WorldTopology) {
        self.topology = topology;
        self.state = MapState::Ready;
        self.recolor();
    }

    pub fn fail(&mut self, err: &MapError) {
        warn!(error = %err, "world map unavailable");
        self.state = MapState::Failed(err.to_string());
    }

    pub fn topology(&self) -> &WorldTopology {
        &self.topology
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CountrySelection> {
        self.selections.subscribe()
    }

    pub fn available(&self) -> &HashSet<String> {
        &self.available
    }

    pub fn set_available_countries<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available = codes.into_iter().map(Into::into).collect();
        self.recolor();
    }

    pub fn update_data(&mut self, result: Arc<TrendsResult>) {
        self.current = Some(result);
        self.recolor();
    }

    pub fn current_result(&self) -> Option<&TrendsResult> {
        self.current.as_deref()
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.selected = None;
        self.highlight = None;
        self.recolor();
    }

    /// Transient emphasis that clears itself after [`HIGHLIGHT_DURATION`].
    pub fn highlight_country(&mut self, code: &str) -> bool {
        let Some(index) = self.topology.position(code) else {
            warn!(code, "no country polygon to highlight");
            return false;
        };

        self.highlight = Some(Highlight {
            index,
            until: Instant::now() + HIGHLIGHT_DURATION,
        });
        true
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlight
            .filter(|highlight| Instant::now() < highlight.until)
            .map(|highlight| highlight.index)
    }

    /// Drop an expired highlight.
    pub fn tick(&mut self) {
        if self.highlight.is_some() && self.highlighted().is_none() {
            self.highlight = None;
        }
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_feature(&self) -> Option<&CountryFeature> {
        self.selected
            .and_then(|index| self.topology.features().get(index))
    }

    pub fn click_at(&mut self, lon: f64, lat: f64) -> ClickOutcome {
        if !self.is_ready() {
            return ClickOutcome::Ignored;
        }
        match self.topology.hit_test(lon, lat) {
            Some(index) => self.select_index(index),
            None => ClickOutcome::Ignored,
        }
    }

    /// Keyboard selection follows the same availability gating as a click,
    /// and works before the topology has loaded.
    pub fn select_country(&mut self, code: &str) -> ClickOutcome {
        match self.topology.position(code) {
            Some(index) => self.select_index(index),
            None if self.available.contains(code) => {
                // No polygon: still loading, or a microstate.
                let name = countries::default_name(code).unwrap_or(code).to_string();
                self.emit(CountrySelection {
                    code: code.to_string(),
                    name,
                })
            }
            None => ClickOutcome::Ignored,
        }
    }

    fn select_index(&mut self, index: usize) -> ClickOutcome {
        let Some(feature) = self.topology.features().get(index) else {
            return ClickOutcome::Ignored;
        };

        let available_code = feature
            .code
            .as_ref()
            .filter(|code| self.available.contains(code.as_str()));
        let Some(code) = available_code else {
            debug!(name = %feature.name, "click on country without data");
            return ClickOutcome::Unavailable {
                name: feature.name.clone(),
            };
        };

        let selection = CountrySelection {
            code: code.clone(),
            name: feature.name.clone(),
        };
        self.selected = Some(index);
        self.emit(selection)
    }

    fn emit(&self, selection: CountrySelection) -> ClickOutcome {
        // No subscribers is not an error.
        let _ = self.selections.send(selection.clone());
        ClickOutcome::Selected(selection)
    }

    pub fn lookup(&self, code: &str) -> CountryInfo {
        let name = self
            .topology
            .position(code)
            .and_then(|index| self.topology.features().get(index))
            .map(|feature| feature.name.clone())
            .or_else(|| countries::default_name(code).map(str::to_string));

        CountryInfo {
            name,
            available: self.available.contains(code),
            value: self
                .current
                .as_ref()
                .and_then(|result| result.region_value(code)),
        }
    }

    pub fn color_of(&self, index: usize) -> Color {
        self.colors.get(index).copied().unwrap_or(NO_DATA_COLOR)
    }

    pub fn color_for_code(&self, code: &str) -> Option<Color> {
        self.topology.position(code).map(|index| self.color_of(index))
    }

    fn recolor(&mut self) {
        let result = self.current.as_deref();
        self.colors = self
            .topology
            .features()
            .iter()
            .map(|feature| fill_color(feature.code.as_deref(), &self.available, result))
            .collect();
    }
}

impl Default for ChoroplethMap {
    fn default() -> Self {
        Self::new()
    }
}
