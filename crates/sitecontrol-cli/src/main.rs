//! SiteControl CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use sitecontrol_cli::cli::{Cli, Commands};
use sitecontrol_cli::commands;
use sitecontrol_cli::config::{self, Config};
use sitecontrol_cli::context::SiteContext;
use sitecontrol_cli::repl::Repl;

fn main() {
    // Environment files first so clap sees SITECONTROL_* values from them.
    config::load_env_files(std::env::args());

    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let result = cli
        .config()
        .map_err(Into::into)
        .and_then(|config| match cli.command {
            Some(Commands::Repl) | None => run_repl(config),
            Some(cmd) => commands::execute(cmd, &config),
        });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_repl(config: Config) -> commands::Result<()> {
    let ctx = SiteContext::open(&config)?;
    let mut repl = Repl::new(ctx, config)?;
    repl.run()?;
    Ok(())
}
