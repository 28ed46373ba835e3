//! Shared UI components (status bar, error banner, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::keymap::{KeyAction, Keymap, describe_action};
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "FORM",
    };
    let errors = match app.errors.reported() {
        0 => String::new(),
        n => format!("  errors:{n}"),
    };
    let msg = format!(
        "mode: {mode}  users:{}  shown:{}{errors}  ?: help  q: quit",
        app.users.len(),
        app.visible_count(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// One-line banner with the last error, if any.
pub fn render_error_banner(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(message) = app.errors.message() else {
        return;
    };
    let p = Paragraph::new(message).style(
        Style::default()
            .fg(app.theme.error_fg)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Keys grouped by what they do, for the help panel.
pub fn binding_summary(keymap: &Keymap) -> BTreeMap<&'static str, BTreeSet<String>> {
    let mut summary: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in keymap.all_bindings() {
        if action == KeyAction::Ignore {
            continue;
        }
        summary
            .entry(describe_action(action))
            .or_default()
            .insert(Keymap::format_key(mods, code));
    }
    summary
}

/// Render the help overlay listing the current bindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(2)).max(12);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let row = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {:>14} │ ", label)),
            Span::styled(keys, italic),
        ])
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Table:", bold))];
    for (label, keys) in binding_summary(&app.keymap) {
        lines.push(row(label, keys.into_iter().collect::<Vec<_>>().join(", ")));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Search box:", bold)));
    lines.push(row("Edit text", "type, Backspace".to_string()));
    lines.push(row("Leave", "Enter, Esc".to_string()));

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("User form:", bold)));
    lines.push(row("Next field", "Tab, Down".to_string()));
    lines.push(row("Previous field", "Shift+Tab, Up".to_string()));
    lines.push(row("Save", "Enter".to_string()));
    lines.push(row("Cancel", "Esc".to_string()));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help (any key closes)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
