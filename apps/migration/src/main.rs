//! Migration CLI tool.

use anyhow::Context;
use clap::{Parser, Subcommand};

use blog_infra::{BlogDatabase, DatabaseConfig};
use migration::{Migrator, MigratorTrait};

mod telemetry;

use telemetry::TelemetryConfig;

#[derive(Debug, Parser)]
#[clap(name = "migration", about = "Apply and inspect blog schema migrations")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations
    Up {
        /// Number of pending migrations to apply; all when omitted
        #[clap(short, long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        /// Number of applied migrations to roll back
        #[clap(short, long, default_value_t = 1)]
        num: u32,
    },
    /// Show which migrations are applied
    Status,
    /// Drop every table, then apply all migrations
    Fresh,
    /// Roll back all migrations, then apply them again
    Refresh,
    /// Roll back all applied migrations
    Reset,
    /// Print the migration order without touching the database
    Plan,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    telemetry::init_telemetry(&TelemetryConfig::from_env());

    if let Command::Plan = cli.command {
        for (position, name) in migration::plan_names()?.iter().enumerate() {
            println!("{:>2}. {name}", position + 1);
        }
        return Ok(());
    }

    let config = DatabaseConfig::from_env()
        .context("reading database configuration")?
        .context("DATABASE_URL must be set to run migrations")?;
    let db = BlogDatabase::connect(&config)
        .await
        .context("connecting to the database")?;
    db.ping().await.context("database did not answer")?;
    let conn = db.conn.as_ref();

    match cli.command {
        Command::Up { num } => Migrator::up(conn, num).await?,
        Command::Down { num } => Migrator::down(conn, Some(num)).await?,
        Command::Status => Migrator::status(conn).await?,
        Command::Fresh => Migrator::fresh(conn).await?,
        Command::Refresh => Migrator::refresh(conn).await?,
        Command::Reset => Migrator::reset(conn).await?,
        Command::Plan => {}
    }

    tracing::info!("Migration command finished");
    Ok(())
}
