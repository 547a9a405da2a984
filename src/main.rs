use clap::Parser;
use public_content_api::app::commands;
use public_content_api::utils::error::PcaError;
use public_content_api::utils::{logger, validation::Validate};
use public_content_api::{CliConfig, HttpGraphQLClient, PublicContentApi};
use std::sync::Arc;

fn report_failure(e: &PcaError) -> i32 {
    tracing::error!(
        "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    e.severity().exit_code()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if let Err(e) = cli.validate() {
        logger::init_cli_logger(&logger::filter_directive(cli.verbose, None));
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(&logger::filter_directive(cli.verbose, None));
            std::process::exit(report_failure(&e));
        }
    };

    // 初始化日誌
    let directive = config.log_directive(cli.verbose);
    if cli.json_logs || config.json_logging() {
        logger::init_json_logger(&directive);
    } else {
        logger::init_cli_logger(&directive);
    }

    tracing::info!("Starting pca");
    tracing::debug!("CLI config: {:?}", cli);

    let client = match HttpGraphQLClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => std::process::exit(report_failure(&e)),
    };
    tracing::info!("🔗 Content service: {}", client.endpoint());

    let mut api = PublicContentApi::with_templates(Arc::new(client), config.template_source());
    api.set_global_context_data(config.global_context_data());

    let cancel = api.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match commands::run(&api, cli.namespace, &cli.command).await {
        Ok(output) => {
            tracing::info!("✅ Request completed");
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Err(e) => std::process::exit(report_failure(&e)),
    }

    Ok(())
}
