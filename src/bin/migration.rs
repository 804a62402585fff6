use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use bookstore_pos_api::{config, db, migrator::Migrator};

/// Schema management for the bookstore database
#[derive(Parser, Debug)]
#[command(name = "migration", version, about)]
struct Cli {
    /// Overrides the configured database URL
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply all pending migrations (default)
    Up,
    /// Roll back the last N migrations
    Down {
        #[arg(short = 'n', long, default_value_t = 1)]
        steps: u32,
    },
    /// Show applied and pending migrations
    Status,
    /// Drop every table and re-apply all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    let conn = db::establish_connection_from_app_config(&cfg).await?;

    match cli.command.unwrap_or(Command::Up) {
        Command::Up => {
            Migrator::up(&conn, None).await?;
            info!("migrations applied");
        }
        Command::Down { steps } => {
            Migrator::down(&conn, Some(steps)).await?;
            info!(steps, "migrations rolled back");
        }
        Command::Status => Migrator::status(&conn).await?,
        Command::Fresh => {
            Migrator::fresh(&conn).await?;
            info!("database recreated");
        }
    }

    Ok(())
}
