use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::domain::{ComparisonResult, TrendsResult};
use crate::format::format_date;

pub const Y_BOUNDS: [f64; 2] = [0.0, 100.0];

pub const SERIES_COLORS: [Color; 5] = [
    Color::Rgb(0x66, 0x7e, 0xea),
    Color::Rgb(0xf0, 0x93, 0xfb),
    Color::Rgb(0x4f, 0xac, 0xfe),
    Color::Rgb(0x43, 0xe9, 0x7b),
    Color::Rgb(0xfa, 0x70, 0x9a),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Color,
    pub values: Vec<u32>,
}

impl Series {
    /// (index, value) pairs in provider order.
    #[allow(clippy::cast_precision_loss)]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (index as f64, f64::from(*value)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesChart {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl SeriesChart {
    #[allow(clippy::cast_precision_loss)]
    pub fn x_bounds(&self) -> [f64; 2] {
        let last = self.labels.len().saturating_sub(1).max(1);
        [0.0, last as f64]
    }

    /// First, middle and last labels, for the x axis.
    pub fn axis_labels(&self) -> Vec<String> {
        match self.labels.len() {
            0 => Vec::new(),
            1 => vec![self.labels[0].clone()],
            2 => self.labels.clone(),
            len => vec![
                self.labels[0].clone(),
                self.labels[len / 2].clone(),
                self.labels[len - 1].clone(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChartView {
    #[default]
    Empty,
    Loading,
    NoData {
        title: String,
    },
    Series(SeriesChart),
}

/// Holds at most one live chart. Every render replaces the previous one
/// and bumps the generation.
#[derive(Debug, Default)]
pub struct ChartRenderer {
    view: ChartView,
    generation: u64,
    area: Option<Rect>,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn view(&self) -> &ChartView {
        &self.view
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub const fn area(&self) -> Option<Rect> {
        self.area
    }

    pub fn has_chart(&self) -> bool {
        matches!(self.view, ChartView::Series(_))
    }

    pub fn series(&self) -> &[Series] {
        match &self.view {
            ChartView::Series(chart) => &chart.series,
            _ => &[],
        }
    }

    pub fn show_loading(&mut self) {
        self.replace(ChartView::Loading);
    }

    pub fn show_no_data(&mut self, title: impl Into<String>) {
        self.replace(ChartView::NoData {
            title: title.into(),
        });
    }

    pub fn clear(&mut self) {
        self.replace(ChartView::Empty);
    }

    pub fn render_series(&mut self, result: &TrendsResult) {
        let title = format!("Search interest for \"{}\"", result.keyword);
        if result.interest_over_time.is_empty() {
            self.show_no_data(title);
            return;
        }

        let labels = result
            .interest_over_time
            .iter()
            .map(|point| point.date.as_deref().map(format_date).unwrap_or_default())
            .collect();
        let series = vec![Series {
            name: result.keyword.clone(),
            color: SERIES_COLORS[0],
            values: result
                .interest_over_time
                .iter()
                .map(|point| point.value)
                .collect(),
        }];

        self.replace(ChartView::Series(SeriesChart {
            title,
            labels,
            series,
        }));
    }

    pub fn render_comparison(&mut self, result: &ComparisonResult) {
        let title = format!("Comparison: {}", result.keywords.join(" vs "));
        if result.comparison_data.is_empty() || result.keywords.is_empty() {
            self.show_no_data(title);
            return;
        }

        let labels = result
            .comparison_data
            .iter()
            .map(|point| point.date.as_deref().map(format_date).unwrap_or_default())
            .collect();
        let series = result
            .keywords
            .iter()
            .zip(SERIES_COLORS.iter().cycle())
            .map(|(keyword, color)| Series {
                name: keyword.clone(),
                color: *color,
                values: result
                    .comparison_data
                    .iter()
                    .map(|point| point.value_for(keyword))
                    .collect(),
            })
            .collect();

        self.replace(ChartView::Series(SeriesChart {
            title,
            labels,
            series,
        }));
    }

    /// Records the drawing area of a live chart; nothing to do otherwise.
    pub fn resize(&mut self, area: Rect) {
        if self.has_chart() {
            self.area = Some(area);
        }
    }

    fn replace(&mut self, view: ChartView) {
        self.view = view;
        self.area = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComparisonPoint, RelatedQueries, TimePoint};
    use std::collections::BTreeMap;

    fn result(points: &[(&str, u32)]) -> TrendsResult {
        TrendsResult {
            keyword: "ai".to_string(),
            geo: "US".to_string(),
            timeframe: None,
            timestamp: String::new(),
            interest_over_time: points
                .iter()
                .map(|(date, value)| TimePoint {
                    date: Some((*date).to_string()),
                    value: *value,
                })
                .collect(),
            interest_by_region: Vec::new(),
            related_queries: RelatedQueries::default(),
        }
    }

    #[test]
    fn series_keeps_provider_order() {
        let mut chart = ChartRenderer::new();
        chart.render_series(&result(&[("2025-02-01", 90), ("2025-01-01", 10)]));

        let ChartView::Series(view) = chart.view() else {
            panic!("expected a series chart");
        };
        assert_eq!(view.series.len(), 1);
        assert_eq!(view.series[0].values, vec![90, 10]);
        assert_eq!(view.labels, vec!["Feb 1, 2025", "Jan 1, 2025"]);
        assert_eq!(view.series[0].points(), vec![(0.0, 90.0), (1.0, 10.0)]);
    }

    #[test]
    fn empty_series_shows_placeholder() {
        let mut chart = ChartRenderer::new();
        chart.render_series(&result(&[]));
        assert!(matches!(chart.view(), ChartView::NoData { .. }));
        assert!(chart.series().is_empty());
    }

    #[test]
    fn each_render_replaces_the_previous_chart() {
        let mut chart = ChartRenderer::new();
        chart.show_loading();
        let loading = chart.generation();
        chart.render_series(&result(&[("2025-01-01", 5)]));

        assert!(chart.generation() > loading);
        assert!(chart.has_chart());
        chart.show_loading();
        assert_eq!(chart.view(), &ChartView::Loading);
    }

    #[test]
    fn resize_without_chart_is_a_no_op() {
        let mut chart = ChartRenderer::new();
        let area = Rect::new(0, 0, 40, 10);
        chart.resize(area);
        assert_eq!(chart.area(), None);
        assert_eq!(chart.generation(), 0);

        chart.render_series(&result(&[("2025-01-01", 5)]));
        chart.resize(area);
        assert_eq!(chart.area(), Some(area));
    }

    #[test]
    fn comparison_builds_one_line_per_keyword() {
        let mut values = BTreeMap::new();
        values.insert("rust".to_string(), 40);
        let comparison = ComparisonResult {
            keywords: vec!["rust".to_string(), "go".to_string()],
            geo: String::new(),
            timeframe: None,
            timestamp: String::new(),
            comparison_data: vec![ComparisonPoint {
                date: Some("2025-01-01".to_string()),
                values,
            }],
        };

        let mut chart = ChartRenderer::new();
        chart.render_comparison(&comparison);
        let series = chart.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].values, vec![40]);
        assert_eq!(series[1].values, vec![0]);
        assert_ne!(series[0].color, series[1].color);
    }

    #[test]
    fn axis_labels_pick_ends_and_middle() {
        let chart = SeriesChart {
            title: String::new(),
            labels: ["a", "b", "c", "d", "e"].iter().map(|s| (*s).to_string()).collect(),
            series: Vec::new(),
        };
        assert_eq!(chart.axis_labels(), vec!["a", "c", "e"]);
        assert_eq!(chart.x_bounds(), [0.0, 4.0]);
    }
}
