use std::process::ExitCode;

use formbook_infra::DbConfig;

#[tokio::main]
async fn main() -> ExitCode {
    formbook_observability::init();

    let config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match formbook_api::server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("formbook-api stopped: {err:#}");
            ExitCode::FAILURE
        }
    }
}
