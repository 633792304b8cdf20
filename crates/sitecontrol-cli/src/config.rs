//! Runtime configuration resolved from flags, environment and defaults.

use std::path::{Path, PathBuf};

use sitecontrol_models::{DayDate, ModelError, Role};
use sitecontrol_workflow::Session;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "SITECONTROL_STATE_DIR";
/// Environment variable selecting the snapshot file.
pub const SNAPSHOT_ENV: &str = "SITECONTROL_SNAPSHOT";
/// Environment variable picking the default role.
pub const ROLE_ENV: &str = "SITECONTROL_ROLE";
/// Environment variable overriding the actor name.
pub const NAME_ENV: &str = "SITECONTROL_NAME";
/// Environment variable pinning "today" (dd.mm.yyyy).
pub const TODAY_ENV: &str = "SITECONTROL_TODAY";

const STATE_DIR_NAME: &str = ".sitecontrol";
const HISTORY_FILE_NAME: &str = "repl_history.txt";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid date '{value}': {source}")]
    InvalidToday {
        value: String,
        #[source]
        source: ModelError,
    },

    #[error("failed to create state directory {path}: {source}")]
    StateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings shared by one-shot commands and the REPL.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    /// Snapshot file; `None` keeps everything in memory.
    pub snapshot: Option<PathBuf>,
    /// Role picked up front, if any.
    pub role: Option<Role>,
    /// Actor name override.
    pub name: Option<String>,
    /// Date used for overdue evaluation and new entries.
    pub today: DayDate,
}

impl Config {
    /// Path of the REPL history file.
    pub fn history_file(&self) -> PathBuf {
        self.state_dir.join(HISTORY_FILE_NAME)
    }

    /// Session for `role`, using the configured name when one was given.
    pub fn session(&self, role: Role) -> Session {
        match &self.name {
            Some(name) => Session::new(role, name.clone()),
            None => Session::for_role(role),
        }
    }

    /// Creates the state directory if it does not exist yet.
    pub fn ensure_state_dir(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.state_dir).map_err(|source| ConfigError::StateDir {
            path: self.state_dir.clone(),
            source,
        })
    }
}

/// `~/.sitecontrol`, or `.sitecontrol` in the working directory when there
/// is no home directory.
pub fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(STATE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(STATE_DIR_NAME))
}

/// Expands a leading `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Parses a "today" override, or returns the local date.
pub fn resolve_today(raw: Option<&str>) -> Result<DayDate, ConfigError> {
    match raw {
        Some(value) => DayDate::parse(value).map_err(|source| ConfigError::InvalidToday {
            value: value.to_string(),
            source,
        }),
        None => Ok(DayDate::today()),
    }
}

/// Loads `.env.local` from the working directory, then from the state
/// directory, and returns that directory.
///
/// Runs before clap so values from either file reach `env =` arguments. The
/// state directory comes from `--state-dir`/`-s` in `args`, then
/// `SITECONTROL_STATE_DIR`, then [`default_state_dir`]. Values already present
/// in the environment win.
pub fn load_env_files<I, S>(args: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let _ = dotenvy::from_filename(".env.local");

    let state_dir = state_dir_arg(args)
        .or_else(|| std::env::var(STATE_DIR_ENV).ok())
        .filter(|dir| !dir.trim().is_empty())
        .map(|dir| expand_path(&dir))
        .unwrap_or_else(default_state_dir);

    load_state_dir_env(&state_dir);
    state_dir
}

/// Loads `<state_dir>/.env.local` if it exists. Returns whether it did.
pub fn load_state_dir_env(state_dir: &Path) -> bool {
    let path = state_dir.join(".env.local");
    match dotenvy::from_path(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded environment file");
            true
        }
        Err(_) => false,
    }
}

/// Finds the `--state-dir` value in raw command-line arguments.
fn state_dir_arg<I, S>(args: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        if arg == "--" {
            break;
        }
        if arg == "--state-dir" || arg == "-s" {
            return args.next().map(|v| v.as_ref().to_string());
        }
        if let Some(value) = arg.strip_prefix("--state-dir=") {
            return Some(value.to_string());
        }
        if let Some(value) = arg.strip_prefix("-s").filter(|v| !v.is_empty()) {
            return Some(value.trim_start_matches('=').to_string());
        }
    }
    None
}
