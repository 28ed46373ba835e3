//! Rendering. Everything here reads `AppState`; the only thing written back is
//! `rows_per_page`, which depends on the terminal size.
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let banner_height = u16::from(app.errors.current().is_some());
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_search_box(f, root[0], app);
    components::render_error_banner(f, root[1], app);
    users::render_users_table(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if app.modal.is_open() {
        users::render_user_modal(f, f.area(), app);
    }
    if app.show_help {
        components::render_help_modal(f, f.area(), app);
    }
}

fn render_search_box(f: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let searching = app.input_mode == InputMode::Search;
    let text = if app.search.is_empty() && !searching {
        Span::styled("Search users... (/)", Style::default().fg(app.theme.muted))
    } else if searching {
        Span::styled(
            format!("{}▏", app.search),
            Style::default().fg(app.theme.highlight_fg),
        )
    } else {
        Span::styled(app.search.clone(), Style::default().fg(app.theme.text))
    };
    let line = Line::from(vec![text, Span::raw("    "), Span::styled("+ Add User (n)", Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))]);
    let p = Paragraph::new(line)
        .block(
            Block::default()
                .title("User Management Dashboard")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if searching { app.theme.highlight_fg } else { app.theme.border })),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}
