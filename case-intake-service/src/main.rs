use case_intake_service::config::CaseIntakeConfig;
use case_intake_service::services::init_metrics;
use case_intake_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics();

    let config = match CaseIntakeConfig::load() {
        Ok(config) => config,
        Err(e) => {
            // Subscriber may depend on config, so report on stderr as well
            eprintln!("Error: failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(
        "case-intake-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start case intake service: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
