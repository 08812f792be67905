use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelwatch::app::RunContext;
use reelwatch::cli::{commands, Cli, Commands, PresetAction};
use reelwatch::scanner::ScanOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reelwatch=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let ctx = RunContext::new(cli.data_dir)?;
    let suppress = cli.suppress_skip_msgs;

    match cli.command.unwrap_or(Commands::Run { interval_hours: 0.0 }) {
        Commands::Run { interval_hours } => {
            let options = ScanOptions::live().suppress_skip_logs(suppress);
            commands::run_monitor(&ctx, interval_hours, options).await?;
        }
        Commands::DryRun {
            interval_hours,
            mark_seen,
        } => {
            let options = ScanOptions::dry_run(mark_seen).suppress_skip_logs(suppress);
            commands::run_monitor(&ctx, interval_hours, options).await?;
        }
        Commands::Add { url, criteria } => {
            commands::add_feed(&ctx, &url, &criteria)?;
        }
        Commands::Edit { url, criteria } => {
            commands::edit_feed(&ctx, &url, &criteria)?;
        }
        Commands::Remove { url } => {
            commands::remove_feed(&ctx, &url)?;
        }
        Commands::List => {
            commands::list_feeds(&ctx)?;
        }
        Commands::Preview {
            url,
            count,
            criteria,
        } => {
            commands::preview_feed(&ctx, &url, count, &criteria).await?;
        }
        Commands::Preset { action } => match action {
            PresetAction::Add {
                name,
                pattern,
                replacement,
            } => commands::add_preset(&ctx, &name, &pattern, &replacement)?,
            PresetAction::Remove { name } => commands::remove_preset(&ctx, &name)?,
            PresetAction::List => commands::list_presets(&ctx)?,
        },
        Commands::Config { bot_token, chat_id } => {
            commands::configure(&ctx, bot_token, chat_id)?;
        }
    }

    Ok(())
}
