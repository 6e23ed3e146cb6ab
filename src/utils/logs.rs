use tracing_subscriber::EnvFilter;
use crate::core::domain::Configuration;

const DEFAULT_FILTER: &str = "info,tower_http=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn setup_tracing(config: &Configuration) {
    if config.is_lambda() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            // disable printing the name of the module in every log line.
            .with_target(false)
            // ANSI color codes show up in a confusing manner in CloudWatch logs.
            .with_ansi(false)
            // CloudWatch adds the ingestion time.
            .without_time()
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .init();
    }
}
