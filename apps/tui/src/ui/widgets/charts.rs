use crate::app::App;
use crate::chart::{ChartView, SeriesChart, Y_BOUNDS};
use crate::format::truncate_text;
use crate::map::intensity_color;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

const REGION_BAR_COUNT: usize = 8;

fn chart_block(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn placeholder(f: &mut Frame<'_>, area: Rect, title: &str, text: &str) {
    let paragraph = Paragraph::new(text.to_string())
        .block(chart_block(title))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

pub fn render_trend_chart(app: &App, f: &mut Frame<'_>, area: Rect) {
    match app.chart.view() {
        ChartView::Empty => placeholder(
            f,
            area,
            "Interest Over Time",
            "Search for a keyword to see interest over time",
        ),
        ChartView::Loading => {
            let throbber = Throbber::default()
                .label("Loading trends...")
                .style(Style::default().fg(Color::Yellow))
                .throbber_set(BRAILLE_SIX);
            let paragraph = Paragraph::new(throbber.to_line(&app.throbber))
                .block(chart_block("Interest Over Time"))
                .alignment(Alignment::Center);
            f.render_widget(paragraph, area);
        }
        ChartView::NoData { title } => placeholder(f, area, title, "No data available"),
        ChartView::Series(chart) => render_series_chart(chart, f, area),
    }
}

fn render_series_chart(chart: &SeriesChart, f: &mut Frame<'_>, area: Rect) {
    let points = chart
        .series
        .iter()
        .map(|series| series.points())
        .collect::<Vec<_>>();

    let datasets = chart
        .series
        .iter()
        .zip(&points)
        .map(|(series, data)| {
            Dataset::default()
                .name(series.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series.color))
                .data(data)
        })
        .collect::<Vec<_>>();

    let x_labels = chart
        .axis_labels()
        .into_iter()
        .map(Span::raw)
        .collect::<Vec<_>>();
    let y_labels = vec![Span::raw("0"), Span::raw("50"), Span::raw("100")];

    let widget = Chart::new(datasets)
        .block(chart_block(chart.title.clone()))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(chart.x_bounds())
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Interest")
                .style(Style::default().fg(Color::Gray))
                .bounds(Y_BOUNDS)
                .labels(y_labels),
        );

    f.render_widget(widget, area);
}

pub fn render_region_bars(app: &App, f: &mut Frame<'_>, area: Rect) {
    let regions = app.top_regions();
    if regions.is_empty() {
        placeholder(f, area, "Top Regions", "No regional data");
        return;
    }

    let bars: Vec<Bar<'_>> = regions
        .iter()
        .take(REGION_BAR_COUNT)
        .map(|region| {
            Bar::default()
                .value(u64::from(region.value))
                .label(TextLine::from(truncate_text(&region.geo_name, 6)))
                .style(Style::default().fg(intensity_color(region.value)))
                .value_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block("Top Regions"))
        .data(BarGroup::default().bars(&bars))
        .max(100)
        .bar_gap(1)
        .bar_width(6);

    f.render_widget(chart, area);
}
