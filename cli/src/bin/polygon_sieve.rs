use clap::Parser;
use cli::{SieveArgs, check_target};
use color_eyre::eyre::Result;
use sieve::{GeoJsonSource, GeoJsonTarget, SieveConfig, Target, run_sieve};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let args = SieveArgs::parse();

    if args.print_schema {
        println!("{}", serde_json::to_string_pretty(&SieveConfig::schema())?);
        return Ok(());
    }

    sieve_dataset(&args).await
}

async fn sieve_dataset(args: &SieveArgs) -> Result<()> {
    let config = args.to_config()?;
    let source_path = args.source()?;
    let target_path = args.target()?;
    check_target(source_path, target_path)?;

    let source = GeoJsonSource::open(source_path)?;
    let target = GeoJsonTarget::new(target_path, config.page_size).with_memory_limit(config.memory_limit_mb);

    match target.memory_limit() {
        Some(limit) => info!("Target memory limit: {} MB", limit),
        None => info!("Target memory limit: none"),
    }
    info!(
        "Sieving {} into {} with resolution {}",
        source_path.display(),
        target_path.display(),
        config.resolution
    );

    let report = run_sieve(source, target, &config).await?;
    info!("✅ Sieved {} tables, {} features written", report.tables.len(), report.total_features());
    Ok(())
}
