use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use tracing_subscriber::EnvFilter;

use mentor_application::{Bootstrap, RouteRequest};

mod helper;
mod screens;

use helper::CliHelper;

#[derive(Parser)]
#[command(name = "mentor")]
#[command(about = "MentorBuddy - AI tutor, future counsellor and exam paper generation", long_about = None)]
struct Cli {
    /// Directory holding config.toml and secret.json (default: platform config dir)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Keep accounts in memory instead of the configured database
    #[arg(long)]
    offline: bool,

    /// Log filter, e.g. `info` or `mentor_core=debug` (RUST_LOG wins)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

/// Installs the stderr fmt subscriber. `RUST_LOG` overrides `default_level`.
fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let bootstrap = Bootstrap::load(cli.config_dir.as_deref()).context("failed to load configuration")?;
    init_logging(cli.log_level.as_deref().unwrap_or(&bootstrap.config.logging.level));
    tracing::info!(
        "[Cli] Config dir {}, data dir {}",
        bootstrap.paths.config_dir().display(),
        bootstrap.paths.data_dir().display()
    );

    let context = bootstrap
        .build_context(cli.offline)
        .await
        .context("failed to start services")?;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== MentorBuddy ===".bright_magenta().bold());
    println!("{}", "Ctrl-C leaves a screen, /quit or Ctrl-D exits.".bright_black());

    let start = RouteRequest {
        route: context.auth().launch_route(),
        params: Vec::new(),
    };
    let result = screens::run(&context, &mut rl, start).await;

    context.shutdown().await;
    println!("{}", "Goodbye!".bright_green());
    result
}
