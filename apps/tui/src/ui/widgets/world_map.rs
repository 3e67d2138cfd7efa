use crate::app::App;
use crate::map::{CountryFeature, MapState, HIGHLIGHT_COLOR, SELECTED_COLOR};
use ratatui::layout::{Alignment, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Equirectangular viewport. Antarctica is cropped.
pub const MAP_X_BOUNDS: [f64; 2] = [-180.0, 180.0];
pub const MAP_Y_BOUNDS: [f64; 2] = [-60.0, 85.0];

const OUTLINE_COLOR: Color = Color::DarkGray;

/// Drawable area inside the map border.
pub fn canvas_area(map_area: Rect) -> Rect {
    map_area.inner(Margin::new(1, 1))
}

/// Longitude and latitude under a terminal cell, if the cell is on the canvas.
pub fn screen_to_geo(canvas: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if canvas.width == 0
        || canvas.height == 0
        || column < canvas.x
        || column >= canvas.right()
        || row < canvas.y
        || row >= canvas.bottom()
    {
        return None;
    }

    let fx = (f64::from(column - canvas.x) + 0.5) / f64::from(canvas.width);
    let fy = (f64::from(row - canvas.y) + 0.5) / f64::from(canvas.height);

    let lon = fx.mul_add(MAP_X_BOUNDS[1] - MAP_X_BOUNDS[0], MAP_X_BOUNDS[0]);
    let lat = fy.mul_add(MAP_Y_BOUNDS[0] - MAP_Y_BOUNDS[1], MAP_Y_BOUNDS[1]);
    Some((lon, lat))
}

fn map_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

pub fn render_world_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let map = &app.map;

    match map.state() {
        MapState::Loading => {
            let paragraph = Paragraph::new("Loading world map...")
                .block(map_block(" World Map ".to_string()))
                .alignment(Alignment::Center);
            f.render_widget(paragraph, area);
        }
        MapState::Failed(message) => {
            let paragraph = Paragraph::new(format!("World map unavailable\n\n{message}"))
                .style(Style::default().fg(Color::Red))
                .block(map_block(" World Map ".to_string()))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, area);
        }
        MapState::Ready => {
            let title = map.selected_feature().map_or_else(
                || " World Map (click a country) ".to_string(),
                |feature| format!(" World Map: {} ", feature.name),
            );
            let features = map.topology().features();
            let selected = map.selected();
            let highlighted = map.highlighted();

            let canvas = Canvas::default()
                .block(map_block(title))
                .marker(Marker::Braille)
                .x_bounds(MAP_X_BOUNDS)
                .y_bounds(MAP_Y_BOUNDS)
                .paint(|ctx| {
                    for (index, feature) in features.iter().enumerate() {
                        draw_outline(ctx, feature, OUTLINE_COLOR);
                        ctx.draw(&Points {
                            coords: &feature.samples,
                            color: map.color_of(index),
                        });
                    }

                    ctx.layer();
                    if let Some(feature) = selected.and_then(|index| features.get(index)) {
                        draw_outline(ctx, feature, SELECTED_COLOR);
                    }
                    if let Some(feature) = highlighted.and_then(|index| features.get(index)) {
                        draw_outline(ctx, feature, HIGHLIGHT_COLOR);
                        ctx.draw(&Points {
                            coords: &feature.samples,
                            color: HIGHLIGHT_COLOR,
                        });
                    }
                });

            f.render_widget(canvas, area);
            render_legend(f, area);
        }
    }
}

fn draw_outline(ctx: &mut Context<'_>, feature: &CountryFeature, color: Color) {
    for ((x1, y1), (x2, y2)) in feature.outline() {
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
    }
}

fn render_legend(f: &mut Frame<'_>, area: Rect) {
    use crate::map::{AVAILABLE_COLOR, INTENSITY_PALETTE, NO_DATA_COLOR};
    use ratatui::text::{Line as TextLine, Span};

    if area.height < 4 || area.width < 40 {
        return;
    }

    let mut spans = vec![
        Span::styled("■", Style::default().fg(NO_DATA_COLOR)),
        Span::raw(" no data  "),
        Span::styled("■", Style::default().fg(AVAILABLE_COLOR)),
        Span::raw(" available  "),
        Span::raw("low "),
    ];
    spans.extend(
        INTENSITY_PALETTE
            .iter()
            .skip(1)
            .map(|color| Span::styled("■", Style::default().fg(*color))),
    );
    spans.push(Span::styled(
        " high",
        Style::default().add_modifier(Modifier::DIM),
    ));

    let legend_area = Rect {
        x: area.x + 2,
        y: area.bottom().saturating_sub(1),
        width: area.width.saturating_sub(4),
        height: 1,
    };
    f.render_widget(Paragraph::new(TextLine::from(spans)), legend_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_corners_map_to_viewport_edges() {
        let canvas = Rect::new(10, 5, 360, 145);

        let (lon, lat) = screen_to_geo(canvas, 10, 5).unwrap();
        assert!((lon - -179.5).abs() < 1e-9);
        assert!((lat - 84.5).abs() < 1e-9);

        let (lon, lat) = screen_to_geo(canvas, 369, 149).unwrap();
        assert!((lon - 179.5).abs() < 1e-9);
        assert!((lat - -59.5).abs() < 1e-9);
    }

    #[test]
    fn cells_outside_the_canvas_are_not_on_the_map() {
        let canvas = canvas_area(Rect::new(0, 0, 40, 20));
        assert!(screen_to_geo(canvas, 0, 0).is_none());
        assert!(screen_to_geo(canvas, 39, 10).is_none());
        assert!(screen_to_geo(canvas, 10, 10).is_some());
        assert!(screen_to_geo(Rect::default(), 0, 0).is_none());
    }
}
