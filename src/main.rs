use anyhow::Context;
use clap::Parser;
use countries_etl::utils::{logger, validation::Validate};
use countries_etl::{
    CliConfig, ConfigProvider, CountryPipeline, EtlEngine, LocalStorage, Storage,
    StorageSettings, TomlConfig,
};

const CONFIG_ERROR_EXIT: i32 = 1;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting countries-etl CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let monitor = cli.monitor;
    let exit_code = match cli.config.clone() {
        Some(path) => {
            let file_config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load config file {}", path))?;
            // flags given on the command line override the file's storage section
            let storage = file_config
                .storage_settings()
                .merged_with(cli.storage_settings());
            execute(file_config, storage, monitor).await
        }
        None => {
            let storage = cli.storage_settings();
            execute(cli, storage, monitor).await
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn execute<C>(config: C, storage: StorageSettings, monitor: bool) -> i32
where
    C: ConfigProvider + Validate + 'static,
{
    if let Err(e) = config.validate().and_then(|_| storage.validate()) {
        tracing::error!(
            "❌ Configuration validation failed ({:?}, {:?} severity): {}",
            e.category(),
            e.severity(),
            e
        );
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return CONFIG_ERROR_EXIT;
    }

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    match storage.local_output.as_deref() {
        Some(dir) => {
            tracing::info!("Writing to local directory {}", dir);
            run_with(LocalStorage::new(dir), config, monitor).await
        }
        None => run_with_s3(&storage, config, monitor).await,
    }
}

#[cfg(feature = "s3")]
async fn run_with_s3<C: ConfigProvider + 'static>(
    storage: &StorageSettings,
    config: C,
    monitor: bool,
) -> i32 {
    let s3 = countries_etl::S3Storage::from_settings(storage).await;
    run_with(s3, config, monitor).await
}

#[cfg(not(feature = "s3"))]
async fn run_with_s3<C: ConfigProvider + 'static>(
    _storage: &StorageSettings,
    _config: C,
    _monitor: bool,
) -> i32 {
    tracing::error!("Built without the `s3` feature; pass --local-output");
    CONFIG_ERROR_EXIT
}

async fn run_with<S, C>(storage: S, config: C, monitor: bool) -> i32
where
    S: Storage + 'static,
    C: ConfigProvider + 'static,
{
    let pipeline = match CountryPipeline::from_config(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(
                "❌ Could not build HTTP client ({:?}, {:?} severity): {}",
                e.category(),
                e.severity(),
                e
            );
            eprintln!("❌ {}", e.user_friendly_message());
            return CONFIG_ERROR_EXIT;
        }
    };

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);
    let report = engine.run().await;
    let bucket = engine.pipeline().config().bucket();

    if report.outcome.is_success() {
        println!("✅ Countries extraction completed successfully!");
    } else {
        eprintln!("❌ Countries extraction finished with {:?}", report.outcome);
    }
    println!(
        "🌍 {} countries, {} translations",
        report.countries, report.translations
    );
    for key in &report.load.written {
        println!("📁 Saved {}/{}", bucket, key);
    }
    for key in &report.load.failed {
        eprintln!("⚠️  Not saved {}/{}", bucket, key);
    }

    report.outcome.exit_code()
}
