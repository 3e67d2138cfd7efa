use crate::app::{App, BannerKind, Focus, HoverInfo};
use crate::config::SelectionMode;
use crate::countries::flag;
use crate::format::{format_relative_time, truncate_text};
use crate::ui::widgets::popup::ClearWidget;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

const MAX_SUGGESTIONS_SHOWN: usize = 6;

fn key_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let inner = area.inner(Margin::new(1, 1));
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let mut title = vec![
        Span::styled(
            "World ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Trends Explorer",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    title.push(match &app.health {
        Some(health) => Span::styled(
            format!("● {}", health.status),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("● backend unknown", Style::default().fg(Color::Gray)),
    });
    if app.is_loading() {
        title.push(Span::raw("  "));
        title.extend(Throbber::default().to_line(&app.throbber).spans);
    }
    f.render_widget(Paragraph::new(TextLine::from(title)), columns[0]);

    let mut context = Vec::new();
    if let Some(selection) = &app.selected_country {
        context.push(Span::styled(
            format!("{} {}", flag(&selection.code), selection.name),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(result) = &app.current_result {
        if !context.is_empty() {
            context.push(Span::raw("  |  "));
        }
        let now = chrono::Local::now().naive_local();
        context.push(Span::styled(
            format!("Updated {}", format_relative_time(&result.timestamp, now)),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(
        Paragraph::new(TextLine::from(context)).alignment(Alignment::Right),
        columns[1],
    );
}

pub fn render_search_box(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Search;
    let border = if focused { Color::Yellow } else { Color::Green };

    let mut title = format!(" Search ({}) ", app.timeframe);
    if app.capabilities.mode == SelectionMode::MapOnly {
        let country = app
            .selected_country
            .as_ref()
            .map_or("pick a country on the map", |selection| selection.name.as_str());
        title = format!(" Search in {country} ({}) ", app.timeframe);
    }

    let line = if app.input.is_empty() && !focused {
        TextLine::from(Span::styled(
            "Type a keyword, \"a, b\" to compare, \"@GB\" for a country",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let cursor = if focused { "_" } else { "" };
        TextLine::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::styled(
                format!("{}{cursor}", app.input),
                Style::default().fg(Color::White),
            ),
        ])
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);
}

/// Dropdown under the search box.
pub fn render_suggestions(app: &App, f: &mut Frame<'_>, search_area: Rect) {
    if app.suggestions.is_empty() || !matches!(app.focus, Focus::Search | Focus::Suggestions) {
        return;
    }

    let frame = f.area();
    let shown = app.suggestions.len().min(MAX_SUGGESTIONS_SHOWN);
    let height = u16::try_from(shown).unwrap_or(0) + 2;
    let area = Rect {
        x: search_area.x + 2,
        y: search_area.bottom(),
        width: (search_area.width / 2).max(20).min(search_area.width.saturating_sub(2)),
        height,
    }
    .intersection(frame);
    if area.is_empty() {
        return;
    }

    let lines = app
        .suggestions
        .iter()
        .take(shown)
        .enumerate()
        .map(|(i, suggestion)| {
            let style = if app.focus == Focus::Suggestions && i == app.suggestion_index {
                Style::default()
                    .bg(Color::Rgb(0x66, 0x7e, 0xea))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let mut spans = vec![Span::styled(truncate_text(&suggestion.title, 40), style)];
            if !suggestion.kind.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", suggestion.kind),
                    Style::default().fg(Color::Gray),
                ));
            }
            TextLine::from(spans)
        })
        .collect::<Vec<_>>();

    f.render_widget(ClearWidget, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Suggestions ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        ),
        area,
    );
}

fn hover_line(hover: &HoverInfo) -> TextLine<'static> {
    let code = hover.code.as_deref().unwrap_or_default();
    let detail = match (hover.available, hover.value) {
        (false, _) => "no data".to_string(),
        (true, Some(value)) => format!("interest {value}"),
        (true, None) => "click to explore".to_string(),
    };
    TextLine::from(vec![
        Span::styled(
            format!("{} {}", flag(code), hover.name),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!(": {detail}"), Style::default().fg(Color::Gray)),
    ])
}

pub fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let line = if let Some(banner) = &app.banner {
        let color = match banner.kind {
            BannerKind::Info => Color::Green,
            BannerKind::Error => Color::Red,
        };
        TextLine::from(Span::styled(banner.text.clone(), Style::default().fg(color)))
    } else if let Some(hover) = &app.hover {
        hover_line(hover)
    } else {
        TextLine::from(Span::styled(
            format!("Focus: {}", app.focus.label()),
            Style::default().fg(Color::DarkGray),
        ))
    };

    f.render_widget(Paragraph::new(line), area);
}

pub fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut keys = vec![
        ("F1", "Help"),
        ("Enter", "Search"),
        ("Tab", "Focus"),
    ];
    if app.capabilities.quick_search {
        keys.push(("F2-F5", "Quick"));
    }
    keys.extend([("F6", "Countries"), ("Esc", "Reset"), ("^C", "Quit")]);

    let mut spans = Vec::new();
    for (i, (key, action)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        }
        spans.push(Span::styled(*key, key_style()));
        spans.push(Span::styled(format!(": {action}"), Style::default().fg(Color::Gray)));
    }

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}
