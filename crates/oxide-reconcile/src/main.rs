//! oxide-reconcile CLI
//!
//! Command-line tool for reconciling PostgreSQL tables with entity files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_reconcile::prelude::*;

/// Declarative schema reconciliation for PostgreSQL.
#[derive(Parser)]
#[command(name = "oxide-reconcile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL.
    #[arg(
        short,
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost/postgres"
    )]
    database: String,

    /// Catalog schema holding the tables.
    #[arg(short, long, env = "RECONCILE_SCHEMA", default_value = "public")]
    schema: String,

    /// Use entity names as table names without pluralizing.
    #[arg(long)]
    no_pluralize: bool,

    /// How to decide whether a table exists.
    #[arg(long, value_enum, default_value_t = ExistenceCheck::Registry)]
    existence_check: ExistenceCheck,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and alter tables to match the entity file.
    Apply {
        /// JSON entity file.
        #[arg(short, long)]
        entities: PathBuf,

        /// Run each entity in a transaction, rolled back on failure.
        #[arg(long)]
        atomic: bool,
    },

    /// Print the SQL that `apply` would run, without executing it.
    Plan {
        /// JSON entity file.
        #[arg(short, long)]
        entities: PathBuf,
    },

    /// Print the table name an entity maps to.
    TableName {
        /// Entity name, e.g. `UserPayment`.
        entity: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = ReconcileOptions::new()
        .schema(cli.schema)
        .pluralize(!cli.no_pluralize)
        .existence_check(cli.existence_check);
    let reconciler = Reconciler::new(options);

    match cli.command {
        Commands::TableName { entity } => {
            println!("{}", reconciler.table_name(&entity));
        }

        Commands::Plan { entities } => {
            let file = EntityFile::load(&entities)?;
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&cli.database)
                .await?;
            let mut conn = pool.acquire().await?;

            for entity in &file.entities {
                let statements = reconciler
                    .plan(&mut *conn, &entity.name, &entity.fields)
                    .await?;
                println!("-- {} ({})", entity.name, reconciler.table_name(&entity.name));
                if statements.is_empty() {
                    println!("-- up to date");
                }
                for sql in &statements {
                    println!("{sql};");
                }
                println!();
            }
        }

        Commands::Apply { entities, atomic } => {
            let file = EntityFile::load(&entities)?;
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&cli.database)
                .await?;

            info!(
                count = file.entities.len(),
                path = %entities.display(),
                "Reconciling entities"
            );
            for entity in &file.entities {
                if atomic {
                    reconciler.reconcile_in_transaction(&pool, entity).await?;
                } else {
                    reconciler.reconcile_with_pool(&pool, entity).await?;
                }
            }
            info!("Schema is up to date.");
        }
    }

    Ok(())
}
