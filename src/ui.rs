//! UI rendering helpers for the terminal user interface.
//!
//! Presentation only: this module draws the current `App` state with
//! `ratatui` and holds no player logic.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, LineGauge, List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, Button};
use crate::config::UiSettings;
use crate::library::PickerMode;
use crate::metadata::format_mmss;

/// Parse an `#rrggbb` string into a terminal color.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Slider fill ratio, clamped to `0.0..=1.0`.
fn slider_ratio(pos: Duration, total: Option<Duration>) -> f64 {
    match total {
        Some(total) if !total.is_zero() => (pos.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Compute a centered rectangle with the given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn button_span<'a>(app: &App, button: Button, accent: Option<Color>) -> Span<'a> {
    let mut style = match accent {
        Some(bg) => Style::default().bg(bg).fg(Color::White),
        None => Style::default().fg(Color::White),
    };
    if !app.button_enabled(button) {
        style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM);
    }
    if app.focus == button {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(button.label().to_string(), style)
}

fn buttons_line<'a>(app: &App, buttons: &[(Button, Option<Color>)]) -> Line<'a> {
    let mut spans: Vec<Span> = Vec::new();
    for (i, (button, accent)) in buttons.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(button_span(app, *button, *accent));
    }
    Line::from(spans)
}

/// Render the entire UI into the provided `frame` using `app` state.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let background = parse_hex_color(&ui_settings.background).unwrap_or(Color::Black);
    frame.render_widget(
        Block::default().style(Style::default().bg(background)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Heading
    let heading = Paragraph::new(ui_settings.heading_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" rondo ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(heading, chunks[0]);

    // Now playing label
    let now_playing = Paragraph::new(app.now_playing_text())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(now_playing, chunks[1]);

    // Position slider, bound to the current track's duration.
    let total = app.now_playing.as_ref().map(|np| np.duration);
    let slider_label = format!(
        "{} / {}",
        format_mmss(app.slider_pos),
        total.map(format_mmss).unwrap_or_else(|| "--:--".to_string())
    );
    let slider = LineGauge::default()
        .block(Block::default().borders(Borders::ALL).title(" position "))
        .filled_style(Style::default().fg(Color::White))
        .unfilled_style(Style::default().fg(Color::DarkGray))
        .ratio(slider_ratio(app.slider_pos, total))
        .label(slider_label);
    frame.render_widget(slider, chunks[2]);

    // Load buttons, with the accent colors of the reference player.
    let load_accent = parse_hex_color(&ui_settings.load_button);
    let folder_accent = parse_hex_color(&ui_settings.folder_button);
    let load_row = Paragraph::new(buttons_line(
        app,
        &[
            (Button::Load, load_accent),
            (Button::LoadFolder, folder_accent),
        ],
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(load_row, chunks[3]);

    // Transport buttons, dimmed until a track list is loaded.
    let transport_row = Paragraph::new(buttons_line(
        app,
        &[
            (Button::Play, None),
            (Button::Pause, None),
            (Button::Stop, None),
            (Button::Next, None),
            (Button::Previous, None),
        ],
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(transport_row, chunks[4]);

    // Track list, highlighting the current index.
    let items: Vec<ListItem> = app
        .tracks
        .iter()
        .map(|t| ListItem::new(t.name.as_str()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    if app.has_tracks() {
        list_state.select(Some(app.current.min(app.tracks.len() - 1)));
    }
    frame.render_stateful_widget(list, chunks[5], &mut list_state);

    // Footer: status line when present, key help otherwise.
    let footer_text = match &app.status {
        Some(status) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )),
        None if app.picker.is_some() => Line::raw(
            "[enter] open/select | [space] mark | [y] confirm | [backspace] up | [esc] cancel",
        ),
        None => Line::raw(
            "[tab/l/h] focus | [enter] press | [←/→] seek | [o] files | [O] folder | [space] play/pause | [q] quit",
        ),
    };
    let footer = Paragraph::new(footer_text)
        .block(Block::default().borders(Borders::ALL).title(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[6]);

    if app.picker.is_some() {
        draw_picker(frame, app, chunks[5]);
    }
}

/// Overlay the file/folder picker above the track list area.
fn draw_picker(frame: &mut Frame, app: &App, area: Rect) {
    let Some(picker) = app.picker.as_ref() else {
        return;
    };

    let popup_area = centered_rect_sized(72, 14, area);
    frame.render_widget(Clear, popup_area);

    let title = match picker.mode {
        PickerMode::Files => " select music ",
        PickerMode::Folder => " select folder ",
    };

    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .map(|entry| {
            let name = if entry.is_dir {
                format!("  {}/", entry.name)
            } else if picker.is_marked(&entry.path) {
                format!("* {}", entry.name)
            } else {
                format!("  {}", entry.name)
            };
            let style = if entry.is_dir {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(name).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(format!(" {} ", picker.cwd.display())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !picker.entries.is_empty() {
        state.select(Some(picker.cursor.min(picker.entries.len() - 1)));
    }
    frame.render_stateful_widget(list, popup_area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_color_handles_reference_palette() {
        assert_eq!(parse_hex_color("#1e1e1e"), Some(Color::Rgb(0x1e, 0x1e, 0x1e)));
        assert_eq!(parse_hex_color("#4CAF50"), Some(Color::Rgb(0x4c, 0xaf, 0x50)));
        assert_eq!(parse_hex_color("#2196F3"), Some(Color::Rgb(0x21, 0x96, 0xf3)));
        assert_eq!(parse_hex_color(" #ffffff "), Some(Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn parse_hex_color_rejects_malformed_input() {
        assert_eq!(parse_hex_color("1e1e1e"), None);
        assert_eq!(parse_hex_color("#1e1e"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn slider_ratio_clamps_and_handles_missing_duration() {
        assert_eq!(slider_ratio(Duration::from_secs(5), None), 0.0);
        assert_eq!(
            slider_ratio(Duration::from_secs(5), Some(Duration::ZERO)),
            0.0
        );
        assert_eq!(
            slider_ratio(Duration::from_secs(30), Some(Duration::from_secs(60))),
            0.5
        );
        assert_eq!(
            slider_ratio(Duration::from_secs(90), Some(Duration::from_secs(60))),
            1.0
        );
    }
}
