use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cardcrawl::app::AppContext;
use cardcrawl::cli::{commands, Cli, Commands, DbAction};
use cardcrawl::config::Config;
use cardcrawl::store::ManagedTable;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `resolve` output stays clean JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Crawl { start, end, csv } => {
            commands::crawl(&ctx, start, end, csv.as_deref()).await?;
        }
        Commands::Gather {
            start,
            end,
            output,
            csv,
        } => {
            commands::gather(&ctx, start, end, &output, csv.as_deref()).await?;
        }
        Commands::Resolve { id, name } => {
            commands::resolve(&ctx, id, &name).await?;
        }
        Commands::Migrate { dir, dry_run } => {
            commands::migrate(&ctx, dir.as_deref(), dry_run)?;
        }
        Commands::Check => {
            let state = commands::check(&ctx);
            std::process::exit(state.exit_code());
        }
        Commands::Setup { seed_range, csv } => {
            let (start, end) = match seed_range.as_slice() {
                [start, end] => (*start, *end),
                _ => anyhow::bail!("--seed-range takes START and END"),
            };
            commands::setup(&ctx, start, end, csv.as_deref()).await?;
        }
        Commands::Db { action } => match action {
            DbAction::Status => commands::db_status(&ctx)?,
            DbAction::ClearAll => commands::clear_tables(&ctx, &ManagedTable::ALL)?,
            DbAction::ClearTable { table } => commands::clear_tables(&ctx, &[table])?,
            DbAction::Reset => commands::reset(&ctx)?,
            DbAction::Seed {
                cards,
                decks,
                start,
                end,
            } => {
                commands::seed(&ctx, cards, decks, start, end)?;
            }
        },
    }

    Ok(())
}
