use std::sync::Arc;
use std::time::Duration;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::layout::Rect;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use super::actions::AppEvent;
use super::search::{ParsedInput, SearchMachine};
use crate::api::TrendsGateway;
use crate::chart::ChartRenderer;
use crate::config::Capabilities;
use crate::countries;
use crate::domain::{
    ComparisonResult, Country, HealthStatus, RegionInterest, RelatedQuery, Suggestion,
    TrendingSearch, TrendingSnapshot, TrendsResult, DEFAULT_TIMEFRAME,
};
use crate::map::{ChoroplethMap, CountrySelection};

pub const BANNER_DURATION: Duration = Duration::from_secs(5);
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);
pub const QUICK_SEARCHES: [&str; 4] = [
    "artificial intelligence",
    "climate change",
    "olympics 2024",
    "cryptocurrency",
];
pub const REGION_LIMIT: usize = 15;
pub const RELATED_LIMIT: usize = 10;
pub const TRENDING_LIMIT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Suggestions,
    Regions,
    Related,
    Trending,
}

impl Focus {
    const ORDER: [Self; 5] = [
        Self::Search,
        Self::Suggestions,
        Self::Regions,
        Self::Related,
        Self::Trending,
    ];

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[super::input::wrap_increment(self.index(), Self::ORDER.len())]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[super::input::wrap_decrement(self.index(), Self::ORDER.len())]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Suggestions => "Suggestions",
            Self::Regions => "Regions",
            Self::Related => "Related",
            Self::Trending => "Trending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    CountryPicker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedTab {
    Top,
    Rising,
}

impl RelatedTab {
    pub const fn toggle(self) -> Self {
        match self {
            Self::Top => Self::Rising,
            Self::Rising => Self::Top,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Rising => "Rising",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
    until: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct CountryPicker {
    pub filter: String,
    pub selected: usize,
}

/// What the pointer is over on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub code: Option<String>,
    pub name: String,
    pub available: bool,
    pub value: Option<u32>,
}

/// Application controller. Owns the chart and map, talks to the gateway
/// through spawned tasks, and applies their results on the UI loop.
pub struct App {
    pub running: bool,
    pub capabilities: Capabilities,
    pub gateway: Arc<TrendsGateway>,
    pub map: ChoroplethMap,
    pub chart: ChartRenderer,
    pub search: SearchMachine,
    /// Bumped by a view reset so late search results are dropped.
    pub search_generation: u64,
    pub input: String,
    pub timeframe: String,
    pub focus: Focus,
    pub overlay: Overlay,
    pub banner: Option<Banner>,
    pub current_result: Option<Arc<TrendsResult>>,
    pub comparison: Option<Arc<ComparisonResult>>,
    pub selected_country: Option<CountrySelection>,
    pub trending: Option<Arc<TrendingSnapshot>>,
    pub trending_pending: Option<String>,
    pub countries: Vec<Country>,
    pub suggestions: Vec<Suggestion>,
    pub suggestion_index: usize,
    pub region_index: usize,
    pub related_tab: RelatedTab,
    pub related_index: usize,
    pub trending_index: usize,
    pub picker: CountryPicker,
    pub hover: Option<HoverInfo>,
    pub health: Option<HealthStatus>,
    pub throbber: ThrobberState,
    pub frame_area: Rect,
    pub(super) suggestions_due: Option<Instant>,
    pub(super) selections: broadcast::Receiver<CountrySelection>,
    pub(super) events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(
        gateway: Arc<TrendsGateway>,
        map: ChoroplethMap,
        chart: ChartRenderer,
        capabilities: Capabilities,
    ) -> Self {
        let selections = map.subscribe();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            capabilities,
            gateway,
            map,
            chart,
            search: SearchMachine::new(),
            search_generation: 0,
            input: String::new(),
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            focus: Focus::Search,
            overlay: Overlay::None,
            banner: None,
            current_result: None,
            comparison: None,
            selected_country: None,
            trending: None,
            trending_pending: None,
            countries: countries::default_countries(),
            suggestions: Vec::new(),
            suggestion_index: 0,
            region_index: 0,
            related_tab: RelatedTab::Top,
            related_index: 0,
            trending_index: 0,
            picker: CountryPicker::default(),
            hover: None,
            health: None,
            throbber: ThrobberState::default(),
            frame_area: Rect::default(),
            suggestions_due: None,
            selections,
            events_tx,
            events_rx,
        }
    }

    pub fn events(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.events_tx.clone()
    }

    pub fn show_info(&mut self, text: impl Into<String>) {
        self.set_banner(text.into(), BannerKind::Info);
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.set_banner(text.into(), BannerKind::Error);
    }

    fn set_banner(&mut self, text: String, kind: BannerKind) {
        self.banner = Some(Banner {
            text,
            kind,
            until: Instant::now() + BANNER_DURATION,
        });
    }

    pub fn is_loading(&self) -> bool {
        self.search.is_busy() || self.trending_pending.is_some()
    }

    /// Per-frame housekeeping: expiries, debounce, spinner, selections.
    pub fn update(&mut self) {
        let now = Instant::now();

        if self.banner.as_ref().is_some_and(|banner| now >= banner.until) {
            self.banner = None;
        }
        self.map.tick();
        if self.is_loading() {
            self.throbber.calc_next();
        }
        if self.suggestions_due.is_some_and(|due| now >= due) {
            self.suggestions_due = None;
            self.request_suggestions();
        }

        self.process_selections();
    }

    /// Apply every completed task without waiting.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completed task and apply it.
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    pub fn parsed_input(&self) -> ParsedInput {
        ParsedInput::parse(&self.input)
    }

    pub fn top_regions(&self) -> Vec<&RegionInterest> {
        self.current_result
            .as_ref()
            .map(|result| result.top_regions(REGION_LIMIT))
            .unwrap_or_default()
    }

    pub fn related_items(&self) -> &[RelatedQuery] {
        let Some(result) = &self.current_result else {
            return &[];
        };
        let items = match self.related_tab {
            RelatedTab::Top => &result.related_queries.top,
            RelatedTab::Rising => &result.related_queries.rising,
        };
        &items[..items.len().min(RELATED_LIMIT)]
    }

    pub fn trending_items(&self) -> &[TrendingSearch] {
        let Some(snapshot) = &self.trending else {
            return &[];
        };
        let items = &snapshot.trending_searches;
        &items[..items.len().min(TRENDING_LIMIT)]
    }

    /// Available countries ranked by fuzzy match against the picker filter.
    pub fn picker_matches(&self) -> Vec<&Country> {
        let available = self
            .countries
            .iter()
            .filter(|country| self.map.available().contains(&country.code));

        let filter = self.picker.filter.trim();
        if filter.is_empty() {
            return available.collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = available
            .filter_map(|country| {
                let haystack = format!("{} {}", country.name, country.code);
                matcher
                    .fuzzy_match(&haystack, filter)
                    .map(|score| (score, country))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, country)| country).collect()
    }
}
