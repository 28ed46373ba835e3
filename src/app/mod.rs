//! Application state types and entry glue.
//!
//! `AppState` is everything the dashboard knows. It is only changed by
//! [`reducer::update`] and by the key handlers in [`update`], both on the UI
//! thread. Network calls leave as [`reducer::Command`]s and come back as
//! [`reducer::Msg`]s through [`effects`].
//!
pub mod effects;
pub mod idpolicy;
pub mod keymap;
pub mod reducer;
pub mod update;

use ratatui::style::Color;
use std::fmt::{Display, Formatter};
use std::path::Path;

use crate::directory::{FormField, FormIssue, User, UserForm};
use crate::error::ErrorSlot;
use crate::search;

pub use idpolicy::IdPolicy;
pub use keymap::Keymap;
pub use reducer::{Command, Msg, SaveTarget};

/// Identifies one network command and its completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Add/edit dialog visibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Modal {
    Closed,
    OpenForCreate,
    OpenForEdit,
}

impl Modal {
    pub fn is_open(self) -> bool {
        !matches!(self, Modal::Closed)
    }
}

/// Focusable items inside the add/edit dialog, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormFocus {
    Field(FormField),
    Save,
    Cancel,
}

impl FormFocus {
    const ORDER: [FormFocus; 5] = [
        FormFocus::Field(FormField::Name),
        FormFocus::Field(FormField::Email),
        FormFocus::Field(FormField::Department),
        FormFocus::Save,
        FormFocus::Cancel,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let Some(color) = parse_color(val) else {
                tracing::warn!(path = %path.display(), key = key.trim(), "ignoring unparsable color");
                continue;
            };
            match key.trim() {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "error_fg" => theme.error_fg = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdash theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };
        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("error_fg", self.error_fg);

        std::fs::write(path, buf)
    }

    /// Load `path`, or write the defaults there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(err) = theme.write_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "could not write default theme");
        }
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Black => "#000000".to_string(),
        Color::White => "#FFFFFF".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        // Other named and indexed colors have no stable hex form
        _ => "reset".to_string(),
    }
}

/// Everything the dashboard shows and edits.
#[derive(Debug)]
pub struct AppState {
    /// Users in arrival order, followed by the ones created here.
    pub users: Vec<User>,
    pub search: String,
    pub errors: ErrorSlot,
    pub form: UserForm,
    pub modal: Modal,
    /// Why the last submit was refused before any request went out.
    pub form_hint: Option<FormIssue>,
    pub form_focus: FormFocus,
    pub input_mode: InputMode,
    /// Index into [`AppState::filtered_users`].
    pub selected: usize,
    pub rows_per_page: usize,
    pub show_help: bool,
    pub theme: Theme,
    pub keymap: Keymap,
    pub id_policy: IdPolicy,
    next_request: u64,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap, id_policy: IdPolicy) -> Self {
        Self {
            users: Vec::new(),
            search: String::new(),
            errors: ErrorSlot::default(),
            form: UserForm::default(),
            modal: Modal::Closed,
            form_hint: None,
            form_focus: FormFocus::Field(FormField::Name),
            input_mode: InputMode::Normal,
            selected: 0,
            rows_per_page: 10,
            show_help: false,
            theme,
            keymap,
            id_policy,
            next_request: 0,
        }
    }

    /// Users matching the search text, recomputed on every call.
    pub fn filtered_users(&self) -> impl Iterator<Item = &User> + Clone + '_ {
        search::filter_users(&self.users, &self.search)
    }

    pub fn visible_count(&self) -> usize {
        self.filtered_users().count()
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.filtered_users().nth(self.selected)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let last = self.visible_count().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn clamp_selection(&mut self) {
        self.move_selection(0);
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::mocha(), Keymap::default(), IdPolicy::default())
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::UserId;

    #[test]
    fn form_focus_cycles_both_ways() {
        let start = FormFocus::Field(FormField::Name);
        assert_eq!(start.prev(), FormFocus::Cancel);
        assert_eq!(FormFocus::Cancel.next(), start);
        assert_eq!(start.next(), FormFocus::Field(FormField::Email));
        assert_eq!(FormFocus::Save.prev(), FormFocus::Field(FormField::Department));
    }

    #[test]
    fn selection_is_bound_to_filtered_view() {
        let mut app = AppState::default();
        app.users = vec![
            User::new(1, "Ann", "ann@x.com"),
            User::new(2, "Bob", "bob@y.com"),
            User::new(3, "Anna", "anna@z.com"),
        ];
        app.search = "ann".into();
        app.move_selection(5);
        assert_eq!(app.selected, 1);
        assert_eq!(app.selected_user().map(|u| u.id.clone()), Some(UserId::Number(3)));
        app.move_selection(-9);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn parse_color_accepts_hex_and_reset() {
        assert_eq!(parse_color("#1e1E2e"), Some(Color::Rgb(0x1e, 0x1e, 0x2e)));
        assert_eq!(parse_color("ffffff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_color(" Reset "), Some(Color::Reset));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("zzzzzz"), None);
    }

    #[test]
    fn request_ids_increase() {
        let mut app = AppState::default();
        assert_eq!(app.next_request_id(), RequestId(1));
        assert_eq!(app.next_request_id(), RequestId(2));
        assert_eq!(RequestId(7).to_string(), "#7");
    }
}
