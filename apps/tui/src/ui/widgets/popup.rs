use crate::app::App;
use crate::countries::flag;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

const HELP_KEYS: [(&str, &str); 14] = [
    ("Enter", "Search (\"a, b\" compares, \"@GB\" picks a country)"),
    ("Tab / Shift-Tab", "Move between search and panels"),
    ("↑/↓", "Navigate suggestions and panels"),
    ("F2-F5", "Quick searches"),
    ("F6 / g", "Pick a country"),
    ("Click", "Select a country on the map"),
    ("r", "Switch top / rising related queries"),
    ("Enter (Regions)", "Highlight region on the map"),
    ("Enter (Related)", "Search the related query"),
    ("Enter (Trending)", "Search the trending query"),
    ("c", "Clear cached responses"),
    ("Esc", "Reset the view"),
    ("F1", "Toggle this help"),
    ("q / Ctrl-C", "Quit"),
];

pub fn render_help(f: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(ClearWidget, popup);

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let lines = HELP_KEYS
        .iter()
        .map(|(key, action)| {
            TextLine::from(vec![
                Span::styled(format!("{key:<18}"), key_style),
                Span::raw(*action),
            ])
        })
        .collect::<Vec<_>>();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup);
}

pub fn render_country_picker(app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(40, 60, area);
    f.render_widget(ClearWidget, popup);

    let matches = app.picker_matches();
    let max_rows = usize::from(popup.height.saturating_sub(4));
    let offset = scroll_offset(matches.len(), max_rows, app.picker.selected);

    let mut lines = vec![
        TextLine::from(vec![
            Span::styled("Filter: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}_", app.picker.filter),
                Style::default().fg(Color::White),
            ),
        ]),
        TextLine::from(""),
    ];

    if matches.is_empty() {
        lines.push(TextLine::from(Span::styled(
            "No matching countries",
            Style::default().fg(Color::Gray),
        )));
    }

    lines.extend(
        matches
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_rows)
            .map(|(i, country)| {
                let style = if i == app.picker.selected {
                    Style::default()
                        .bg(Color::Rgb(0x66, 0x7e, 0xea))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                TextLine::from(Span::styled(
                    format!("{} {} ({})", flag(&country.code), country.name, country.code),
                    style,
                ))
            }),
    );

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .title(format!(" Countries ({}) ", matches.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(paragraph, popup);
}
