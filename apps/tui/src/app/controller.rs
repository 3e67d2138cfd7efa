use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::actions::{
    spawn_compare, spawn_countries, spawn_health, spawn_search, spawn_suggestions,
    spawn_topology_load, spawn_trending, AppEvent,
};
use super::search::{ParsedInput, SearchEvent, SearchRequest};
use super::state::{App, Focus, HoverInfo, Overlay, SUGGESTION_DEBOUNCE, QUICK_SEARCHES};
use crate::config::{SelectionMode, TopologyConfig};
use crate::countries::flag;
use crate::domain::TrendsResult;
use crate::error::TrendsError;
use crate::map::{ClickOutcome, CountrySelection};

impl App {
    /// Start-up fetches: backend health and the country allow-list.
    pub fn start_background_loads(&self) {
        spawn_health(Arc::clone(&self.gateway), self.events());
        spawn_countries(Arc::clone(&self.gateway), self.events());
    }

    pub fn load_map(&self, config: TopologyConfig, timeout: Duration) {
        spawn_topology_load(self.events(), config, timeout);
    }

    fn search_geo(&self, parsed: &ParsedInput) -> Result<String, TrendsError> {
        if parsed.keywords.is_empty() {
            return Ok(String::new());
        }

        let selected = self
            .selected_country
            .as_ref()
            .map(|selection| selection.code.clone());
        match self.capabilities.mode {
            SelectionMode::MapOnly => selected.ok_or_else(|| {
                TrendsError::validation("country", "pick a country on the map first")
            }),
            SelectionMode::SearchAndMap => Ok(parsed.geo.clone().or(selected).unwrap_or_default()),
        }
    }

    /// Run the search box contents. Returns whether a request was started.
    pub fn submit_search(&mut self) -> bool {
        let parsed = self.parsed_input();
        let request = self
            .search_geo(&parsed)
            .and_then(|geo| parsed.into_request(&geo, &self.timeframe));

        match request {
            Ok(request) => self.start_search(request),
            Err(err) => {
                debug!(error = %err, "search rejected");
                self.show_error(err.user_message());
                false
            }
        }
    }

    /// At most one primary search runs at a time; extra requests are dropped.
    pub fn start_search(&mut self, request: SearchRequest) -> bool {
        if let Err(err) = self.search.process_event(&SearchEvent::Start(request.clone())) {
            info!(%err, requested = %request, "search already in flight, dropping request");
            return false;
        }

        self.suggestions.clear();
        self.suggestions_due = None;
        self.chart.show_loading();

        let gateway = Arc::clone(&self.gateway);
        let generation = self.search_generation;
        match request {
            SearchRequest::Keyword(query) => {
                spawn_search(gateway, self.events(), query, generation);
            }
            SearchRequest::Compare(query) => {
                spawn_compare(gateway, self.events(), query, generation);
            }
        }
        true
    }

    pub fn search_keyword(&mut self, keyword: &str, geo: &str) -> bool {
        self.input = if geo.is_empty() {
            keyword.to_string()
        } else {
            format!("{keyword} @{geo}")
        };
        self.submit_search()
    }

    pub fn quick_search(&mut self, index: usize) -> bool {
        if !self.capabilities.quick_search {
            return false;
        }
        let Some(keyword) = QUICK_SEARCHES.get(index) else {
            return false;
        };
        self.input = (*keyword).to_string();
        self.submit_search()
    }

    fn finish_search(&mut self, outcome: SearchEvent) {
        if let Err(err) = self.search.finish(outcome) {
            warn!(%err, "unexpected search completion");
        }
    }

    fn search_failed(&mut self, err: &TrendsError) {
        self.finish_search(SearchEvent::Failed(err.to_string()));
        self.chart.show_no_data("Search failed");
        error!(error = %err, kind = ?err.kind(), "search failed");
        self.show_error(err.user_message());
    }

    fn apply_result(&mut self, result: Arc<TrendsResult>) {
        self.chart.render_series(&result);
        self.map.update_data(Arc::clone(&result));
        if !result.geo.is_empty() && self.map.is_ready() {
            self.map.highlight_country(&result.geo);
        }

        self.comparison = None;
        self.region_index = 0;
        self.related_index = 0;
        self.current_result = Some(result);
    }

    /// A search started before the last view reset frees the slot but
    /// leaves the view alone.
    fn is_stale_search(&mut self, generation: u64) -> bool {
        if generation == self.search_generation {
            return false;
        }
        self.finish_search(SearchEvent::Succeeded);
        debug!(generation, current = self.search_generation, "dropping result from before reset");
        true
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        if event
            .search_generation()
            .is_some_and(|generation| self.is_stale_search(generation))
        {
            return;
        }

        match event {
            AppEvent::SearchFinished { result: Ok(result), .. } => {
                self.finish_search(SearchEvent::Succeeded);
                self.apply_result(result);
            }
            AppEvent::CompareFinished { result: Ok(result), .. } => {
                self.finish_search(SearchEvent::Succeeded);
                self.chart.render_comparison(&result);
                self.comparison = Some(result);
            }
            AppEvent::SearchFinished { result: Err(err), .. }
            | AppEvent::CompareFinished { result: Err(err), .. } => {
                self.search_failed(&err);
            }
            AppEvent::TrendingFinished { geo, result } => {
                if self.trending_pending.as_deref() == Some(geo.as_str()) {
                    self.trending_pending = None;
                }
                match result {
                    Ok(snapshot) => {
                        self.trending = Some(snapshot);
                        self.trending_index = 0;
                    }
                    Err(err) => {
                        warn!(error = %err, %geo, "trending searches failed");
                        self.show_error(err.user_message());
                    }
                }
            }
            AppEvent::SuggestionsFinished {
                keyword,
                suggestions,
            } => {
                let current = self.parsed_input();
                if current.suggestion_term() == Some(keyword.as_str()) && !self.search.is_busy() {
                    self.suggestions = suggestions.suggestions.clone();
                    self.suggestion_index = 0;
                } else {
                    debug!(%keyword, "stale suggestions ignored");
                }
            }
            AppEvent::CountriesLoaded(list) => {
                if list.countries.is_empty() {
                    debug!("backend country list empty, keeping defaults");
                } else {
                    self.countries = list.countries.clone();
                    self.map
                        .set_available_countries(list.countries.iter().map(|c| c.code.clone()));
                }
            }
            AppEvent::HealthChecked(health) => {
                if health.is_none() {
                    self.show_error("Cannot reach the trends backend. Searches will fail until it is back.");
                }
                self.health = health;
            }
            AppEvent::TopologyLoaded(Ok(topology)) => {
                info!(countries = topology.len(), "world map ready");
                self.map.install(topology);
            }
            AppEvent::TopologyLoaded(Err(err)) => {
                self.map.fail(&err);
                self.show_error(format!("World map unavailable: {err}"));
            }
        }
    }

    /// Apply country selections published by the map.
    pub fn process_selections(&mut self) {
        loop {
            match self.selections.try_recv() {
                Ok(selection) => self.handle_selection(selection),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "missed country selections");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    fn handle_selection(&mut self, selection: CountrySelection) {
        self.show_info(format!("{} {} selected", flag(&selection.code), selection.name));
        self.load_trending(&selection.code);

        let has_keyword = !self.parsed_input().keywords.is_empty();
        self.selected_country = Some(selection);
        if self.capabilities.mode == SelectionMode::MapOnly && has_keyword {
            self.submit_search();
        }
    }

    pub fn load_trending(&mut self, geo: &str) {
        self.trending_pending = Some(geo.to_string());
        spawn_trending(Arc::clone(&self.gateway), self.events(), geo.to_string());
    }

    fn apply_click(&mut self, outcome: ClickOutcome) {
        match outcome {
            ClickOutcome::Unavailable { name } => {
                self.show_info(format!("No trends data available for {name}"));
            }
            // Selections arrive through the map subscription.
            ClickOutcome::Ignored | ClickOutcome::Selected(_) => {}
        }
    }

    pub fn click_map(&mut self, lon: f64, lat: f64) {
        let outcome = self.map.click_at(lon, lat);
        self.apply_click(outcome);
    }

    pub fn hover_map(&mut self, lon: f64, lat: f64) {
        if !self.map.is_ready() {
            self.hover = None;
            return;
        }

        let topology = self.map.topology();
        self.hover = topology
            .hit_test(lon, lat)
            .and_then(|index| topology.features().get(index))
            .map(|feature| {
                let info = feature.code.as_deref().map(|code| self.map.lookup(code));
                HoverInfo {
                    code: feature.code.clone(),
                    name: feature.name.clone(),
                    available: info.as_ref().is_some_and(|info| info.available),
                    value: info.and_then(|info| info.value),
                }
            });
    }

    pub fn open_country_picker(&mut self) {
        self.picker.filter.clear();
        self.picker.selected = 0;
        self.overlay = Overlay::CountryPicker;
    }

    pub fn pick_country(&mut self) {
        let code = self
            .picker_matches()
            .get(self.picker.selected)
            .map(|country| country.code.clone());
        self.overlay = Overlay::None;

        if let Some(code) = code {
            let outcome = self.map.select_country(&code);
            self.apply_click(outcome);
        }
    }

    pub fn highlight_region(&mut self) {
        let Some((code, name)) = self
            .top_regions()
            .get(self.region_index)
            .map(|region| (region.geo_code.clone(), region.geo_name.clone()))
        else {
            return;
        };

        if !self.map.highlight_country(&code) {
            self.show_info(format!("{name} is not on the map"));
        }
    }

    pub fn search_related(&mut self) {
        let Some(query) = self
            .related_items()
            .get(self.related_index)
            .map(|item| item.query.clone())
        else {
            return;
        };
        let geo = self
            .current_result
            .as_ref()
            .map(|result| result.geo.clone())
            .unwrap_or_default();
        self.search_keyword(&query, &geo);
    }

    pub fn search_trending(&mut self) {
        let Some(query) = self
            .trending_items()
            .get(self.trending_index)
            .map(|item| item.query.clone())
        else {
            return;
        };
        let geo = self
            .trending
            .as_ref()
            .map(|snapshot| snapshot.geo.clone())
            .unwrap_or_default();
        self.search_keyword(&query, &geo);
    }

    pub fn choose_suggestion(&mut self) {
        let Some(title) = self
            .suggestions
            .get(self.suggestion_index)
            .map(|suggestion| suggestion.title.clone())
        else {
            return;
        };
        let geo = self.parsed_input().geo.unwrap_or_default();
        self.focus = Focus::Search;
        self.search_keyword(&title, &geo);
    }

    /// Debounce suggestion fetches while the user types.
    pub fn input_changed(&mut self) {
        if self.parsed_input().suggestion_term().is_some() {
            self.suggestions_due = Some(Instant::now() + SUGGESTION_DEBOUNCE);
        } else {
            self.suggestions_due = None;
            self.suggestions.clear();
        }
    }

    pub(super) fn request_suggestions(&mut self) {
        let Some(term) = self.parsed_input().suggestion_term().map(str::to_string) else {
            return;
        };
        spawn_suggestions(Arc::clone(&self.gateway), self.events(), term);
    }

    pub fn clear_cache(&mut self) {
        self.gateway.clear_cache();
        self.show_info("Cache cleared");
    }

    /// Back to the initial view: no result, no selection, no panels.
    pub fn reset_view(&mut self) {
        self.search_generation = self.search_generation.wrapping_add(1);
        self.map.reset();
        self.chart.clear();
        self.current_result = None;
        self.comparison = None;
        self.selected_country = None;
        self.trending = None;
        self.suggestions.clear();
        self.suggestions_due = None;
        self.input.clear();
        self.hover = None;
        self.focus = Focus::Search;
        self.region_index = 0;
        self.related_index = 0;
        self.trending_index = 0;
        self.show_info("View reset");
    }
}
