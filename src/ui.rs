//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the TUI using `ratatui`. It only reads from [`App`].

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Tabs, Wrap},
};
use std::time::Duration;

use crate::app::{App, ConnState, View};
use crate::config::{TimeField, UiSettings};
use crate::library::{UNKNOWN, normalize, title_or_file};
use crate::mpd::{NowPlaying, PlayState};

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter/l", "open/play"),
    ("h", "back"),
    ("tab", "all/artists"),
    ("space/p", "play/pause"),
    ("n/N", "next/prev"),
    ("K", "metadata"),
    ("r", "reconnect"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{}] {}", k, v))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
/// Total and remaining are left out while the duration is unknown.
fn now_playing_time_text(now: &NowPlaying, ui: &UiSettings) -> Option<String> {
    let total = (!now.duration.is_zero()).then_some(now.duration);

    let parts: Vec<String> = ui
        .now_playing_time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_mmss(now.elapsed)),
            TimeField::Total => total.map(format_mmss),
            TimeField::Remaining => {
                total.map(|t| format!("-{}", format_mmss(t.saturating_sub(now.elapsed))))
            }
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn now_playing_song_text(now: &NowPlaying) -> String {
    if now.title.trim().is_empty() && now.artist.trim().is_empty() {
        return "-".to_string();
    }
    let title = if now.title.trim().is_empty() {
        UNKNOWN
    } else {
        now.title.trim()
    };
    format!("{} — {}", normalize(&now.artist), title)
}

fn progress_ratio(now: &NowPlaying) -> f64 {
    if now.duration.is_zero() {
        return 0.0;
    }
    (now.elapsed.as_secs_f64() / now.duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Visible `[start, end)` window that keeps `selected` near the middle.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Compute a centered rectangle with given size constrained to `r`.
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

fn conn_badge(app: &App) -> (&'static str, Color) {
    match app.state {
        ConnState::Disconnected => ("● offline", Color::Red),
        ConnState::Connecting => ("● connecting", Color::Yellow),
        ConnState::Loading => ("● loading library", Color::Yellow),
        ConnState::Ready if !app.idle_in_flight() => ("● connected, not watching", Color::Yellow),
        ConnState::Ready => ("● connected", Color::Green),
    }
}

fn state_color(state: PlayState) -> Color {
    match state {
        PlayState::Play => Color::Green,
        PlayState::Pause => Color::Yellow,
        PlayState::Stop | PlayState::Unknown => Color::DarkGray,
    }
}

fn left_padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let (badge, color) = conn_badge(app);
    let header = Paragraph::new(Line::from(vec![
        ui_settings.header_text.as_str().into(),
        "  ".into(),
        badge.fg(color),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" allegro ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(header, chunks[0]);

    // Status box: song line plus progress gauge
    let status_block = Block::bordered().padding(left_padded()).title(" status ");
    let status_inner = status_block.inner(chunks[1]);
    frame.render_widget(status_block, chunks[1]);

    let status_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(status_inner);

    let mut song = format!(" • {}", now_playing_song_text(&app.now));
    let album = normalize(&app.now.album);
    if album != UNKNOWN {
        song.push_str(&format!(" [{}]", album));
    }
    let song_line = Line::from(vec![
        app.now.state.label().fg(state_color(app.now.state)),
        song.into(),
    ]);
    frame.render_widget(Paragraph::new(song_line), status_rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(progress_ratio(&app.now))
        .label(now_playing_time_text(&app.now, ui_settings).unwrap_or_default());
    frame.render_widget(gauge, status_rows[1]);

    // Tabs and breadcrumb
    let tab_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1)])
        .split(chunks[2]);
    let selected_tab = match app.nav.view {
        View::Tracks => 0,
        View::Browser => 1,
    };
    let tabs = Tabs::new(vec!["All", "Artists"])
        .select(selected_tab)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
    frame.render_widget(tabs, tab_row[0]);
    if app.nav.view == View::Browser {
        frame.render_widget(Paragraph::new(app.nav.breadcrumb()).dim(), tab_row[1]);
    }

    // Main list
    {
        let rows = app.rows();
        let total = rows.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let cursor = app.nav.cursor();
        let (start, end) = visible_window(total, list_height, cursor);

        // Only build ListItems for the visible window.
        let visible_items: Vec<ListItem> = rows[start..end]
            .iter()
            .map(|r| ListItem::new(r.as_str()))
            .collect();

        let title = if total == 0 && app.state == ConnState::Ready {
            " library is empty ".to_string()
        } else {
            format!(" {} ", total)
        };
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(cursor - start));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    // Overlay metadata popup (keeps list visible under it)
    if app.show_info {
        let list_area = chunks[3];
        let popup_area = centered_rect_sized(72, 9, list_area);
        frame.render_widget(Clear, popup_area);

        let meta = match app.selected_track() {
            Some(track) => format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nTrack: {}  Disc: {}\nDuration: {}\nURI: {}",
                title_or_file(track),
                normalize(&track.artist),
                normalize(&track.album),
                track.track_no,
                track.disc_no,
                format_mmss(track.duration),
                track.uri
            ),
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(left_padded())
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    if let Some(err) = &app.last_error {
        frame.render_widget(
            Paragraph::new(format!(" error: {}", err)).fg(Color::Red),
            chunks[4],
        );
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
