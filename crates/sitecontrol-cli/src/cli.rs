//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use sitecontrol_models::{EntryStatus, ReviewDecision, Role};

use crate::config::{self, Config, ConfigError};

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("SITECONTROL_GIT_HASH");
    const BUILD_DATE: &str = env!("SITECONTROL_BUILD_DATE");

    // Format: "0.1.0 (abc1234, 19.10.2026)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// SiteControl - construction quality control: work journal, reviews and inspections
#[derive(Parser, Debug)]
#[command(name = "sitecontrol")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = "SITECONTROL_STATE_DIR", global = true)]
    pub state_dir: Option<String>,

    /// Snapshot file to load from and save to (in-memory only if omitted)
    #[arg(long, env = "SITECONTROL_SNAPSHOT", global = true)]
    pub snapshot: Option<String>,

    /// Act as contractor or supervisor
    #[arg(long = "as", value_name = "ROLE", env = "SITECONTROL_ROLE", global = true)]
    pub role: Option<Role>,

    /// Display name of the acting user
    #[arg(long, env = "SITECONTROL_NAME", global = true)]
    pub name: Option<String>,

    /// Evaluate deadlines as of this date (dd.mm.yyyy)
    #[arg(long, value_name = "DATE", env = "SITECONTROL_TODAY", global = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List construction projects
    Projects {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List work items with their status as of today
    Work {
        /// Only work items of this project
        #[arg(short, long)]
        project: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the work journal, newest first
    Journal {
        /// Only entries of this project
        #[arg(short, long)]
        project: Option<String>,

        /// Only entries with this status (pending, accepted, rejected)
        #[arg(long)]
        status: Option<EntryStatus>,

        /// Only entries submitted under the acting name
        #[arg(short, long)]
        mine: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Submit a journal entry (contractor)
    Submit {
        /// Project ID
        #[arg(required = true)]
        project: String,

        /// Work item ID
        #[arg(required = true)]
        work_item: String,

        /// Description of the work performed
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Accept or reject a pending journal entry (supervisor)
    Review {
        /// Journal entry ID
        #[arg(required = true)]
        entry: String,

        /// accept or reject
        #[arg(required = true)]
        decision: ReviewDecision,

        /// Review comment
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// List inspections, including the active one
    Inspections {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show dashboard counters
    Stats {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Start interactive REPL mode
    Repl,
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Resolves flags and environment into a [`Config`].
    pub fn config(&self) -> Result<Config, ConfigError> {
        let state_dir = self
            .state_dir
            .as_deref()
            .map(config::expand_path)
            .unwrap_or_else(config::default_state_dir);

        Ok(Config {
            state_dir,
            snapshot: self.snapshot.as_deref().map(config::expand_path),
            role: self.role,
            name: self.name.clone().filter(|n| !n.trim().is_empty()),
            today: config::resolve_today(self.today.as_deref())?,
        })
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_no_args() {
        // No args should work (enters REPL mode)
        let cli = Cli::parse_from(["sitecontrol"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_projects_json() {
        let cli = Cli::parse_from(["sitecontrol", "projects", "--format", "json"]);
        match cli.command {
            Some(Commands::Projects { format }) => assert_eq!(format, OutputFormat::Json),
            _ => panic!("Expected Projects command"),
        }
    }

    #[test]
    fn test_cli_parse_work_default_format() {
        let cli = Cli::parse_from(["sitecontrol", "work", "--project", "p1"]);
        match cli.command {
            Some(Commands::Work { project, format }) => {
                assert_eq!(project.as_deref(), Some("p1"));
                assert_eq!(format, OutputFormat::Table);
            }
            _ => panic!("Expected Work command"),
        }
    }

    #[test]
    fn test_cli_parse_journal_filters() {
        let cli = Cli::parse_from(["sitecontrol", "journal", "--status", "pending", "--mine"]);
        match cli.command {
            Some(Commands::Journal { status, mine, project, .. }) => {
                assert_eq!(status, Some(EntryStatus::Pending));
                assert!(mine);
                assert!(project.is_none());
            }
            _ => panic!("Expected Journal command"),
        }
    }

    #[test]
    fn test_cli_parse_submit_joins_words() {
        let cli = Cli::parse_from([
            "sitecontrol", "--as", "contractor", "submit", "p1", "w1", "Уложено", "50", "м",
        ]);
        assert_eq!(cli.role, Some(Role::Contractor));
        match cli.command {
            Some(Commands::Submit { project, work_item, text }) => {
                assert_eq!(project, "p1");
                assert_eq!(work_item, "w1");
                assert_eq!(text.join(" "), "Уложено 50 м");
            }
            _ => panic!("Expected Submit command"),
        }
    }

    #[test]
    fn test_cli_parse_submit_requires_text() {
        assert!(Cli::try_parse_from(["sitecontrol", "submit", "p1", "w1"]).is_err());
    }

    #[test]
    fn test_cli_parse_review() {
        let cli = Cli::parse_from(["sitecontrol", "review", "e1", "reject", "-c", "Нет фото"]);
        match cli.command {
            Some(Commands::Review { entry, decision, comment }) => {
                assert_eq!(entry, "e1");
                assert_eq!(decision, ReviewDecision::Reject);
                assert_eq!(comment.as_deref(), Some("Нет фото"));
            }
            _ => panic!("Expected Review command"),
        }
    }

    #[test]
    fn test_cli_parse_review_rejects_unknown_decision() {
        assert!(Cli::try_parse_from(["sitecontrol", "review", "e1", "maybe"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "sitecontrol", "stats", "--snapshot", "/tmp/site.json", "--today", "01.09.2024",
        ]);
        let config = cli.config().unwrap();
        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/site.json")));
        assert_eq!(config.today.to_string(), "01.09.2024");
    }

    #[test]
    fn test_cli_config_state_dir_override() {
        let cli = Cli::parse_from(["sitecontrol", "-s", "/tmp/sitecontrol-state", "--today", "01.09.2024"]);
        let config = cli.config().unwrap();
        assert_eq!(config.state_dir, PathBuf::from("/tmp/sitecontrol-state"));
    }

    #[test]
    fn test_cli_config_invalid_today() {
        let cli = Cli::parse_from(["sitecontrol", "--today", "31.02.2024"]);
        assert!(cli.config().is_err());
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["sitecontrol", "-vvv"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_cli_help() {
        // Verify help can be generated without panic
        Cli::command().debug_assert();
    }
}
