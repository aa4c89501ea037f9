use clap::Parser;
use stringdex_probe::config::cli::report_outcome;
use stringdex_probe::core::ConfigProvider;
use stringdex_probe::utils::{logger, validation::Validate};
use stringdex_probe::{AnalyzePipeline, CliConfig, LocalStorage, ProbeEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting stringdex-probe index analysis");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let format = settings.report_format();
    let storage = LocalStorage::new(".".to_string());
    let engine = ProbeEngine::new(AnalyzePipeline::new(storage, settings));

    let exit_code = report_outcome(engine.run().await, format);
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
