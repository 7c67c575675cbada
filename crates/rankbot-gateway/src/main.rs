//! Community bot entry point
//!
//! Run with:
//! ```bash
//! BOT_TOKEN=... cargo run -p rankbot-gateway
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use rankbot_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Tracing verbosity depends on APP_ENV, so configuration comes first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Err(e) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {e}");
            }
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        health = ?config.health.as_ref().map(|h| h.address()),
        "Configuration loaded"
    );

    if let Err(e) = rankbot_gateway::run(config).await {
        error!(error = %e, "Bot stopped with an error");
        std::process::exit(1);
    }
}
