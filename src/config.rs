//! Command line and environment configuration.
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::app::IdPolicy;
use crate::directory::DEFAULT_ENDPOINT;

/// TUI dashboard for a remote REST user directory.
#[derive(Debug, Parser)]
#[command(name = "userdash", version, about)]
pub struct Cli {
    /// Collection URL of the user directory.
    #[arg(long, env = "USERDASH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// How newly created users get their displayed id.
    #[arg(long, env = "USERDASH_ID_POLICY", value_enum, default_value_t = IdPolicy::ListLength)]
    pub id_policy: IdPolicy,

    /// Directory holding theme.conf and keybinds.conf.
    #[arg(long, env = "USERDASH_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Where logs are written; the terminal itself is never logged to.
    #[arg(long, env = "USERDASH_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub id_policy: IdPolicy,
    pub config_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Settings {
    pub fn theme_path(&self) -> PathBuf {
        self.config_dir.join("theme.conf")
    }

    pub fn keymap_path(&self) -> PathBuf {
        self.config_dir.join("keybinds.conf")
    }
}

impl Cli {
    pub fn into_settings(self) -> Settings {
        Settings {
            endpoint: self.endpoint,
            id_policy: self.id_policy,
            config_dir: self.config_dir.unwrap_or_else(default_config_dir),
            log_file: self
                .log_file
                .unwrap_or_else(|| std::env::temp_dir().join("userdash.log")),
        }
    }
}

/// `$XDG_CONFIG_HOME/userdash`, then `$HOME/.config/userdash`, then the working directory.
pub fn default_config_dir() -> PathBuf {
    let from_env = |var: &str| std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from);
    if let Some(xdg) = from_env("XDG_CONFIG_HOME") {
        return xdg.join("userdash");
    }
    if let Some(home) = from_env("HOME") {
        return home.join(".config").join("userdash");
    }
    PathBuf::from(".")
}

/// Create `dir` if needed so config files can be written into it.
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}
