// Dashboard rendering: header, search box, map, chart and detail panels

pub mod panels;
pub mod widgets;

use crate::app::{App, Overlay};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

/// Screen regions of the dashboard, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub search: Rect,
    pub map: Rect,
    pub chart: Rect,
    pub region_bars: Rect,
    pub regions: Rect,
    pub related: Rect,
    pub trending: Rect,
    pub status: Rect,
    pub shortcuts: Rect,
}

pub fn dashboard_layout(area: Rect) -> DashboardLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(3),  // Search box
            Constraint::Min(10),    // Map and chart
            Constraint::Length(10), // Detail panels
            Constraint::Length(1),  // Status
            Constraint::Length(1),  // Shortcuts
        ])
        .split(area);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    let chart_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(middle[1]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[3]);

    DashboardLayout {
        header: rows[0],
        search: rows[1],
        map: middle[0],
        chart: chart_column[0],
        region_bars: chart_column[1],
        regions: panels[0],
        related: panels[1],
        trending: panels[2],
        status: rows[4],
        shortcuts: rows[5],
    }
}

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let layout = dashboard_layout(area);

    panels::render_header(app, f, layout.header);
    panels::render_search_box(app, f, layout.search);
    widgets::world_map::render_world_map(app, f, layout.map);
    widgets::charts::render_trend_chart(app, f, layout.chart);
    widgets::charts::render_region_bars(app, f, layout.region_bars);
    widgets::tables::render_regions(app, f, layout.regions);
    widgets::tables::render_related(app, f, layout.related);
    widgets::tables::render_trending(app, f, layout.trending);
    panels::render_status(app, f, layout.status);
    panels::render_shortcuts(app, f, layout.shortcuts);

    panels::render_suggestions(app, f, layout.search);

    match app.overlay {
        Overlay::None => {}
        Overlay::Help => widgets::popup::render_help(f, area),
        Overlay::CountryPicker => widgets::popup::render_country_picker(app, f, area),
    }
}
