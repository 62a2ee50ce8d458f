use breed_stats::core::ConfigProvider;
use breed_stats::utils::error::ErrorSeverity;
use breed_stats::utils::{logger, validation::Validate};
use breed_stats::{BreedPipeline, CliConfig, LocalStorage, ReportEngine, StatsError, TomlConfig};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting breed-stats CLI");
    if cli.verbose {
        tracing::debug!(
            "CLI config: endpoint={}, output={}, trait={:?}, strict={}",
            cli.api_endpoint,
            cli.output_path,
            cli.trait_name,
            cli.strict_ranges
        );
    }

    let exit_code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(mut config) => {
                    // 命令列參數優先於設定檔
                    cli.override_toml(&mut config);
                    tracing::info!("📋 Report: {}", config.report_name());
                    run(config).await
                }
                Err(e) => report_error(&e),
            }
        }
        None => run(cli).await,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> i32 {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return report_error(&e);
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = match BreedPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => return report_error(&e),
    };

    let engine = ReportEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Report completed successfully!");
            println!("✅ {} breeds, {} groups", summary.records, summary.groups);
            if summary.warnings > 0 {
                println!("⚠️ {} malformed values skipped", summary.warnings);
            }
            println!("📁 Output saved to: {}", summary.output_path);
            0
        }
        Err(e) => report_error(&e),
    }
}

fn report_error(e: &StatsError) -> i32 {
    tracing::error!(
        "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
