//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, LoadState};
use crate::config::UiSettings;
use crate::playlist::{PlaylistHeader, SortKey, format_duration, pluralize};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("s".to_string(), "cycle sort".to_string());
    map.insert("0-3".to_string(), "pick sort".to_string());
    map.insert("/".to_string(), "filter".to_string());
    map.insert("K".to_string(), "details".to_string());
    map.insert("r".to_string(), "reload".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    let order = ["j/k", "gg/G", "s", "0-3", "/", "K", "r", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Sort picker line: every key with its digit, the active one bracketed.
fn sort_picker_text(active: SortKey) -> String {
    SortKey::ALL
        .iter()
        .enumerate()
        .map(|(i, &k)| {
            if k == active {
                format!("[{}:{}]", i, k.label())
            } else {
                format!(" {}:{} ", i, k.label())
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Header lines for a loaded playlist.
fn header_lines(header: &PlaylistHeader) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from("PLAYLIST").dim(),
        Line::from(header.name.clone()).bold(),
    ];

    let mut meta: Vec<String> = Vec::new();
    if let Some(owner) = &header.owner {
        meta.push(owner.clone());
    }
    if header.followers > 0 {
        meta.push(pluralize(header.followers, "follower"));
    }
    meta.push(pluralize(header.total_tracks, "song"));
    lines.push(Line::from(meta.join(" • ")));

    if let Some(url) = &header.image_url {
        lines.push(Line::from(url.clone()).dim());
    }
    lines
}

/// Status line describing load progress and the active sort/filter.
fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(" SORT: {}", app.sort.label()));

    let tracks = pluralize(app.tracks.len() as u64, "track");
    let with_features = app.features.len();
    match &app.load_state {
        LoadState::Idle => parts.push("Idle".to_string()),
        LoadState::Loading { pages } => parts.push(format!(
            "Loading… {} • {} • {} with features",
            pluralize(*pages as u64, "page"),
            tracks,
            with_features
        )),
        LoadState::Done { pages } => parts.push(format!(
            "Loaded {} from {} • {} with features",
            tracks,
            pluralize(*pages as u64, "page"),
            with_features
        )),
        LoadState::Failed(msg) => parts.push(format!("Load failed: {}", msg)),
    }

    if let Some(err) = &app.last_error {
        parts.push(format!("Last error: {}", err));
    }

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        let mut filter_part = String::from("FILTER:");
        if !q.is_empty() {
            filter_part.push(' ');
            filter_part.push_str(q);
        }
        parts.push(filter_part);
    }

    parts.join(" • ")
}

/// Uppercase the characters of `text` at the fuzzy-match `positions`.
fn highlight_matches(text: &str, positions: Vec<usize>) -> String {
    let mut rendered = String::new();
    let mut pos_iter = positions.into_iter();
    let mut next_pos = pos_iter.next();

    for (ci, ch) in text.chars().enumerate() {
        if next_pos == Some(ci) {
            for up in ch.to_uppercase() {
                rendered.push(up);
            }
            next_pos = pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

/// Format a sort value: tempo in BPM, everything else as a unit fraction.
fn format_sort_value(key: SortKey, value: Option<f64>) -> String {
    match (key, value) {
        (_, None) => "    -".to_string(),
        (SortKey::Tempo, Some(v)) => format!("{:5.1}", v),
        (_, Some(v)) => format!("{:5.3}", v),
    }
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

/// Details text for the selected track: metadata followed by every feature.
fn details_text(app: &App) -> String {
    let Some(track) = app.selected_track() else {
        return "No track selected".to_string();
    };

    let artists = track.artist_line().unwrap_or_else(|| "-".to_string());
    let duration = match track.duration {
        Some(d) => format_duration(d),
        None => "-".to_string(),
    };
    let explicit = if track.explicit { "yes" } else { "no" };

    let mut lines = vec![
        format!("Title: {}", track.name),
        format!("Artists: {artists}"),
        format!("Album: {}", track.album.as_deref().unwrap_or("-")),
        format!("Duration: {duration}"),
        format!("Explicit: {explicit}"),
        format!("Id: {}", track.id),
    ];

    match app.features_for(app.selected) {
        Some(features) => {
            lines.push(String::new());
            for (name, value) in &features.values {
                lines.push(format!("{}: {}", name, value));
            }
        }
        None => {
            lines.push(String::new());
            lines.push("No audio features".to_string());
        }
    }

    lines.join("\n")
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, display: &[usize], ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header_body: Vec<Line> = match &app.header {
        Some(h) => header_lines(h),
        None if app.is_loading() => vec![Line::from("Loading playlist…").slow_blink()],
        None => vec![Line::from("No playlist loaded")],
    };
    let header = Paragraph::new(header_body)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(ui_settings.header_text.as_str())
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = vec![
        Line::from(status_text(app)),
        Line::from(sort_picker_text(app.sort)).dim(),
    ];
    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let q = app.filter_query.trim();
        let query_lower = q.to_ascii_lowercase();
        let value_column = ui_settings.show_sort_value && app.sort.feature_name().is_some();

        // Only build ListItems for the visible window, keeping the selection centered.
        let total = display.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = display[start..end]
            .iter()
            .map(|&i| {
                let text = app.row_text(i);
                let row = if q.is_empty() {
                    text.to_string()
                } else {
                    match app.fuzzy_match_positions_for_track(i, &query_lower) {
                        Some(positions) => highlight_matches(text, positions),
                        None => text.to_string(),
                    }
                };

                if value_column {
                    ListItem::new(format!(
                        "{}  {}",
                        format_sort_value(app.sort, app.sort_value(i)),
                        row
                    ))
                } else {
                    ListItem::new(row)
                }
            })
            .collect();

        let title = format!(" tracks ({}) ", total);
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Details popup stays inside the list area.
    if app.details_window {
        let list_area = chunks[2];
        let popup_area = centered_rect_sized(60, 24, list_area);
        frame.render_widget(Clear, popup_area);

        let details = Paragraph::new(details_text(app))
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" details (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(details, popup_area);
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
