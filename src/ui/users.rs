use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::app::{AppState, FormFocus, Modal};
use crate::directory::FormField;

/// Table of the filtered users, paged so the selected row is visible.
pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected / app.rows_per_page) * app.rows_per_page;
    let rows = app
        .filtered_users()
        .enumerate()
        .skip(start)
        .take(app.rows_per_page)
        .map(|(i, u)| {
            let selected = i == app.selected;
            let style = if selected {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .bg(app.theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            let actions = if selected { "[e] Edit  [d] Delete" } else { "Edit  Delete" };
            Row::new(vec![
                Cell::from(u.id.to_string()),
                Cell::from(u.name.clone()),
                Cell::from(u.email.clone()),
                Cell::from(u.department_label().to_string()),
                Cell::from(actions),
            ])
            .style(style)
        })
        .collect::<Vec<_>>();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Percentage(35),
        Constraint::Percentage(20),
        Constraint::Length(22),
    ];
    let header = Row::new(vec!["ID", "Name", "Email", "Department", "Actions"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

/// The add/edit dialog.
pub fn render_user_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match app.modal {
        Modal::OpenForEdit => "Edit User",
        Modal::OpenForCreate | Modal::Closed => "Add User",
    };
    let width = 60u16.min(area.width.saturating_sub(4)).max(40);
    let rect = crate::ui::components::centered_rect(width, 11, area);

    let marker = |focus: FormFocus| if app.form_focus == focus { "▶ " } else { "  " };
    let mut lines: Vec<Line> = Vec::new();
    for field in [FormField::Name, FormField::Email, FormField::Department] {
        let focus = FormFocus::Field(field);
        let required = if field == FormField::Department { " " } else { "*" };
        let value = app.form.get(field);
        let shown = if value.is_empty() {
            Span::styled(field.label(), Style::default().fg(app.theme.muted))
        } else {
            Span::styled(value.to_string(), Style::default().fg(app.theme.text))
        };
        let mut spans = vec![
            Span::raw(marker(focus)),
            Span::styled(
                format!("{:<11}{} ", field.label(), required),
                Style::default().fg(app.theme.header_fg),
            ),
            shown,
        ];
        if app.form_focus == focus {
            spans.push(Span::styled("▏", Style::default().fg(app.theme.highlight_fg)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::raw(""));
    let hint = app.form_hint.map(|h| h.message()).unwrap_or("");
    lines.push(Line::from(Span::styled(hint, Style::default().fg(app.theme.error_fg))));
    lines.push(Line::raw(""));

    let button = |focus: FormFocus, label: &'static str| {
        let style = if app.form_focus == focus {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Span::styled(label, style)
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        button(FormFocus::Save, "[ Save ]"),
        Span::raw("   "),
        button(FormFocus::Cancel, "[ Cancel ]"),
    ]));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
