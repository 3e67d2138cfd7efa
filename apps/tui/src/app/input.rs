use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::state::{App, Focus, Overlay};
use crate::ui::{dashboard_layout, widgets::world_map};

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

pub fn handle_input(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }

    if handle_help_toggle(app, key.code) {
        return;
    }

    if app.overlay == Overlay::CountryPicker {
        handle_picker_input(app, key.code);
        return;
    }

    match key.code {
        KeyCode::F(n @ 2..=5) => {
            app.quick_search(usize::from(n - 2));
        }
        KeyCode::F(6) => app.open_country_picker(),
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Esc => app.reset_view(),
        code if app.focus == Focus::Search => handle_search_input(app, code),
        code => handle_panel_input(app, code),
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) {
        app.overlay = if app.overlay == Overlay::Help {
            Overlay::None
        } else {
            Overlay::Help
        };
        return true;
    }

    if app.overlay == Overlay::Help {
        if key == KeyCode::Esc {
            app.overlay = Overlay::None;
        }
        return true;
    }

    false
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter => {
            app.submit_search();
        }
        KeyCode::Char(c) => {
            app.input.push(c);
            app.input_changed();
        }
        KeyCode::Backspace => {
            app.input.pop();
            app.input_changed();
        }
        KeyCode::Down if !app.suggestions.is_empty() => {
            app.focus = Focus::Suggestions;
            app.suggestion_index = 0;
        }
        _ => {}
    }
}

fn panel_len(app: &App) -> usize {
    match app.focus {
        Focus::Search => 0,
        Focus::Suggestions => app.suggestions.len(),
        Focus::Regions => app.top_regions().len(),
        Focus::Related => app.related_items().len(),
        Focus::Trending => app.trending_items().len(),
    }
}

fn panel_index(app: &mut App) -> Option<&mut usize> {
    match app.focus {
        Focus::Search => None,
        Focus::Suggestions => Some(&mut app.suggestion_index),
        Focus::Regions => Some(&mut app.region_index),
        Focus::Related => Some(&mut app.related_index),
        Focus::Trending => Some(&mut app.trending_index),
    }
}

fn handle_panel_input(app: &mut App, key: KeyCode) {
    let len = panel_len(app);

    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('c') => app.clear_cache(),
        KeyCode::Char('g') => app.open_country_picker(),
        KeyCode::Char('/') => app.focus = Focus::Search,
        KeyCode::Char('r') if app.focus == Focus::Related => {
            app.related_tab = app.related_tab.toggle();
            app.related_index = 0;
        }
        KeyCode::Up => {
            if let Some(index) = panel_index(app) {
                *index = wrap_decrement(*index, len);
            }
        }
        KeyCode::Down => {
            if let Some(index) = panel_index(app) {
                *index = wrap_increment(*index, len);
            }
        }
        KeyCode::Enter => match app.focus {
            Focus::Search => {
                app.submit_search();
            }
            Focus::Suggestions => app.choose_suggestion(),
            Focus::Regions => app.highlight_region(),
            Focus::Related => app.search_related(),
            Focus::Trending => app.search_trending(),
        },
        _ => {}
    }
}

fn handle_picker_input(app: &mut App, key: KeyCode) {
    let len = app.picker_matches().len();

    match key {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Enter => app.pick_country(),
        KeyCode::Up => app.picker.selected = wrap_decrement(app.picker.selected, len),
        KeyCode::Down => app.picker.selected = wrap_increment(app.picker.selected, len),
        KeyCode::Backspace => {
            app.picker.filter.pop();
            app.picker.selected = 0;
        }
        KeyCode::Char(c) => {
            app.picker.filter.push(c);
            app.picker.selected = 0;
        }
        _ => {}
    }
}

/// Clicks and hover over the map canvas.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.overlay != Overlay::None {
        return;
    }

    let canvas = world_map::canvas_area(dashboard_layout(app.frame_area).map);
    let Some((lon, lat)) = world_map::screen_to_geo(canvas, mouse.column, mouse.row) else {
        if mouse.kind == MouseEventKind::Moved {
            app.hover = None;
        }
        return;
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click_map(lon, lat),
        MouseEventKind::Moved => app.hover_map(lon, lat),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_helpers() {
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_increment(0, 0), 0);
        assert_eq!(wrap_decrement(0, 0), 0);
    }
}
