use clap::Parser;
use phone_spec_etl::core::ConfigProvider;
use phone_spec_etl::utils::{logger, validation::Validate};
use phone_spec_etl::{CliConfig, EtlEngine, EtlError, HttpFetcher, LocalStorage, SpecPipeline};

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
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting phone-spec-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let storage = LocalStorage::new(config.data_dir().to_string());
    let fetcher = match HttpFetcher::new(config.user_agent(), config.timeout_secs()) {
        Ok(fetcher) => fetcher,
        Err(e) => fail(&e),
    };
    let pipeline = SpecPipeline::new(storage, config, fetcher);
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
