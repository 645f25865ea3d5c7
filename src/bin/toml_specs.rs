use clap::Parser;
use phone_spec_etl::core::{ConfigProvider, Source};
use phone_spec_etl::utils::{
    logger,
    validation::{validate_url, Validate},
};
use phone_spec_etl::{EtlEngine, EtlError, HttpFetcher, LocalStorage, SpecPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-specs")]
#[command(about = "Spec refresh driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "specs.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the number of concurrent feed requests
    #[arg(long)]
    concurrent_requests: Option<usize>,

    /// Dry run - show what would be fetched without executing
    #[arg(long)]
    dry_run: bool,
}

fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Spec refresh failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(concurrent) = args.concurrent_requests {
        config
            .fetch
            .get_or_insert_with(Default::default)
            .concurrent_requests = Some(concurrent);
        tracing::info!("🔧 Concurrent requests overridden to: {}", concurrent);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    display_config_summary(&config, &args);

    let storage = LocalStorage::new(config.data_dir().to_string());
    let fetcher = match HttpFetcher::new(config.user_agent(), config.timeout_secs()) {
        Ok(fetcher) => fetcher,
        Err(e) => fail(&e),
    };
    let pipeline = SpecPipeline::new(storage, config, fetcher);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No feeds will be fetched");
        let sources = match pipeline.load_sources().await {
            Ok(sources) => sources,
            Err(e) => fail(&e),
        };
        let catalog = match pipeline.load_catalog().await {
            Ok(catalog) => catalog,
            Err(e) => fail(&e),
        };
        perform_dry_run(&sources, catalog.len());
        return Ok(());
    }

    let engine = EtlEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Spec refresh completed");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Data dir: {}", config.data_dir());
    println!("  Seed: {}", config.seed_file());
    println!("  Sources: {}", config.sources_file());
    println!("  Output: {}", config.output_file());
    println!("  Concurrent Requests: {}", config.concurrent_requests());
    println!("  Timeout: {}s", config.timeout_secs());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(sources: &[Source], catalog_len: usize) {
    println!("🔍 Dry Run Analysis:");
    println!("  Catalog entries: {}", catalog_len);
    println!("  Sources: {}", sources.len());
    for source in sources {
        match validate_url("url", &source.url) {
            Ok(()) => println!("    - {} ({})", source.name, source.url),
            Err(e) => println!("    - ⚠️ {} will be skipped: {}", source.name, e),
        }
    }
    println!();
    println!("✅ Dry run analysis complete.");
}
