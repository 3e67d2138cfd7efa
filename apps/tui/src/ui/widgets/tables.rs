use crate::app::{App, Focus};
use crate::countries::flag;
use crate::format::truncate_text;
use crate::map::intensity_color;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let color = if focused { Color::Yellow } else { Color::Cyan };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(0x66, 0x7e, 0xea))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn render_empty(f: &mut Frame<'_>, area: Rect, title: String, focused: bool, text: &str) {
    let paragraph = Paragraph::new(text.to_string())
        .block(panel_block(title, focused))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Rows that fit inside a bordered panel, minus an optional header row.
fn visible_rows(area: Rect, header: bool) -> usize {
    usize::from(area.height.saturating_sub(if header { 3 } else { 2 }))
}

pub fn render_regions(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Regions;
    let regions = app.top_regions();
    if regions.is_empty() {
        render_empty(f, area, " Regions ".to_string(), focused, "No regional data");
        return;
    }

    let max_rows = visible_rows(area, true);
    let offset = scroll_offset(regions.len(), max_rows, app.region_index);

    let rows = regions
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_rows)
        .map(|(i, region)| {
            let style = if focused && i == app.region_index {
                selected_style()
            } else {
                Style::default().fg(intensity_color(region.value))
            };
            Row::new(vec![
                Cell::from(format!("{}.", i + 1)),
                Cell::from(truncate_text(&region.geo_name, 24)),
                Cell::from(region.value.to_string()),
            ])
            .style(style)
        });

    let header = Row::new(vec![Cell::from("#"), Cell::from("Region"), Cell::from("Interest")])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let widths = [
        Constraint::Length(4),
        Constraint::Min(10),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel_block(
            format!(" Regions ({}) ", regions.len()),
            focused,
        ))
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_related(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Related;
    let title = format!(" Related: {} (r to switch) ", app.related_tab.label());
    let items = app.related_items();
    if items.is_empty() {
        render_empty(f, area, title, focused, "No related queries");
        return;
    }

    let max_rows = visible_rows(area, false);
    let offset = scroll_offset(items.len(), max_rows, app.related_index);

    let rows = items
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_rows)
        .map(|(i, item)| {
            let style = if focused && i == app.related_index {
                selected_style()
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(truncate_text(&item.query, 28)),
                Cell::from(item.value.to_string()).style(Style::default().fg(Color::Gray)),
            ])
            .style(style)
        });

    let table = Table::new(rows, [Constraint::Min(10), Constraint::Length(9)])
        .block(panel_block(title, focused))
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_trending(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Trending;
    let title = app.trending.as_ref().map_or_else(
        || " Trending ".to_string(),
        |snapshot| format!(" Trending in {} {} ", flag(&snapshot.geo), snapshot.country),
    );

    let items = app.trending_items();
    if items.is_empty() {
        let text = match &app.trending_pending {
            Some(geo) => format!("Loading trending searches for {geo}..."),
            None => "Select a country to see what is trending".to_string(),
        };
        render_empty(f, area, title, focused, &text);
        return;
    }

    let max_rows = visible_rows(area, false);
    let offset = scroll_offset(items.len(), max_rows, app.trending_index);

    let rows = items
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_rows)
        .map(|(i, item)| {
            let style = if focused && i == app.trending_index {
                selected_style()
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(format!("{:>2}.", item.rank)),
                Cell::from(truncate_text(&item.query, 30)),
            ])
            .style(style)
        });

    let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(10)])
        .block(panel_block(title, focused))
        .column_spacing(1);

    f.render_widget(table, area);
}
