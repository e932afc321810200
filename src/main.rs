//! gitgpt - CLI entry point.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use gitgpt::config::Config;
use gitgpt::flags::FlagSet;
use gitgpt::flows::{AppContext, build_queue};
use gitgpt::git::Git2Workspace;
use gitgpt::history::CliHistory;
use gitgpt::llm::{CompletionGateway, ENCODER_MODEL, TiktokenCounter};
use gitgpt::output::Console;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let flags = FlagSet::parse(std::env::args().skip(1)).context("Failed to parse arguments")?;
    init_tracing(flags.verbose);

    let config = Config::from_env().context("Invalid configuration")?;
    let tokens = TiktokenCounter::for_model(ENCODER_MODEL)
        .context("Failed to load the token encoder")?;

    let console = Console::stdout(flags.verbose);
    let gateway = CompletionGateway::new(
        Box::new(config.backend()),
        config.model.clone(),
        console.clone(),
    );
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let workspace = Git2Workspace::new(cwd);

    let queue_flags = flags.clone();
    let mut ctx = AppContext::new(
        flags,
        gateway,
        Box::new(workspace),
        Box::new(tokens),
        console,
    );
    ctx.history = config
        .history_path
        .clone()
        .map(CliHistory::new)
        .unwrap_or_else(CliHistory::in_memory);
    ctx.changelog_path = config.changelog_path.clone();
    ctx.shell_history_path = config.shell_history_path.clone();

    build_queue(&queue_flags)
        .drain(&mut ctx)
        .await
        .context("gitgpt failed")?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
