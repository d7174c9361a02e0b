use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use catalog_api::{
    config::{self, AppConfig},
    db::{self, DbPool},
    services::{catalog::CatalogService, currency::CurrencyClient},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::InitSchema(args) => handle_init_schema(&context, args, cli.json).await?,
        Commands::Import(args) => handle_import(&context, args, cli.json).await?,
        Commands::Convert => handle_convert(&context, cli.json).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "catalog-admin",
    about = "Catalog maintenance: schema bootstrap, CSV loading, and euro conversion",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop and recreate the catalog schema, discarding all rows
    InitSchema(InitSchemaArgs),
    /// Load products from a CSV file, skipping rows that do not parse
    Import(ImportArgs),
    /// Fill the euro price columns from the current sell rate
    Convert,
}

#[derive(Args)]
struct InitSchemaArgs {
    #[arg(long, help = "CSV file to load right after the schema is recreated")]
    seed: Option<PathBuf>,
}

#[derive(Args)]
struct ImportArgs {
    #[arg(long, help = "CSV file to load")]
    file: PathBuf,
}

struct CliContext {
    _config: AppConfig,
    db: Arc<DbPool>,
    catalog: CatalogService,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(&config.log_level, config.log_json);

        let db_pool = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;
        let db = Arc::new(db_pool);

        let currency =
            Arc::new(CurrencyClient::new(&config).context("failed to build currency client")?);
        let catalog = CatalogService::new(db.clone(), currency);

        Ok(Self {
            _config: config,
            db,
            catalog,
        })
    }
}

#[derive(Serialize)]
struct InitSchemaOutput {
    schema: &'static str,
    seeded: Option<catalog_api::import::ImportSummary>,
}

async fn handle_init_schema(context: &CliContext, args: InitSchemaArgs, json: bool) -> Result<()> {
    db::reset_schema(&context.db)
        .await
        .context("failed to recreate schema")?;

    let seeded = match args.seed.as_deref() {
        Some(path) => Some(
            context
                .catalog
                .import_from_csv(path)
                .await
                .with_context(|| format!("failed to seed from {}", path.display()))?,
        ),
        None => None,
    };

    if json {
        print_json(&InitSchemaOutput {
            schema: "recreated",
            seeded,
        })?;
    } else {
        println!("Schema recreated.");
        if let Some(summary) = seeded {
            println!(
                "Seeded {} products ({} rows skipped).",
                summary.inserted, summary.skipped
            );
        }
    }

    Ok(())
}

async fn handle_import(context: &CliContext, args: ImportArgs, json: bool) -> Result<()> {
    let summary = context
        .catalog
        .import_from_csv(&args.file)
        .await
        .with_context(|| format!("failed to import {}", args.file.display()))?;

    if json {
        print_json(&summary)?;
    } else {
        println!(
            "Imported {} products ({} rows skipped).",
            summary.inserted, summary.skipped
        );
    }

    Ok(())
}

async fn handle_convert(context: &CliContext, json: bool) -> Result<()> {
    let conversion = context
        .catalog
        .convert_catalog_prices()
        .await
        .context("failed to convert catalog prices")?;

    if json {
        print_json(&conversion)?;
    } else {
        println!(
            "Converted {} rows at sell rate {}.",
            conversion.rows, conversion.rate
        );
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
