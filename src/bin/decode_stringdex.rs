use clap::Parser;
use stringdex_probe::config::cli::report_outcome;
use stringdex_probe::core::ConfigProvider;
use stringdex_probe::utils::{logger, validation::Validate};
use stringdex_probe::{CliConfig, DecodePipeline, LocalStorage, ProbeEngine};

#[derive(Parser)]
#[command(name = "decode-stringdex")]
#[command(about = "Pull UTF-16LE strings and offset tables out of a rustdoc search index")]
struct Args {
    #[command(flatten)]
    common: CliConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.common.verbose);

    tracing::info!("🚀 Starting stringdex decode attempt");

    let settings = match args.common.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let format = settings.report_format();
    let storage = LocalStorage::new(".".to_string());
    let engine = ProbeEngine::new(DecodePipeline::new(storage, settings));

    let exit_code = report_outcome(engine.run().await, format);
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
