use clap::Parser;
use svc_router::utils::error::{ErrorSeverity, RouterError};
use svc_router::utils::{logger, validation::Validate};
use svc_router::{CliConfig, ServiceRouter};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting svc-router CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Request failed: {} (Severity: {:?})",
            e,
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(exit_code(&e));
    }
}

async fn run(config: &CliConfig) -> Result<(), RouterError> {
    config.validate()?;

    let router = ServiceRouter::from_provider(config)?;

    if config.list {
        let listing = serde_json::to_string_pretty(router.configuration())
            .map_err(|e| RouterError::ConfigError {
                message: format!("Failed to render service list: {}", e),
            })?;
        println!("{}", listing);
        return Ok(());
    }

    let service = svc_router::utils::validation::validate_required_field("service", &config.service)?;
    let handle = router.resolve(service)?;
    tracing::info!("📡 {} {}", config.method.to_uppercase(), handle.url_for(&config.path));

    let body = handle.invoke(&config.path, config.request_options()?).await?;
    let rendered = serde_json::to_string_pretty(&body).map_err(|e| RouterError::ConfigError {
        message: format!("Failed to render response: {}", e),
    })?;
    println!("{}", rendered);

    Ok(())
}

fn exit_code(error: &RouterError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // 傳輸錯誤，可重試
        ErrorSeverity::High => 1,   // 服務拒絕請求
        ErrorSeverity::Critical => 3, // 配置錯誤
    }
}
