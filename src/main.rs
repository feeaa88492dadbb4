use tracing::{info, warn};

use filegate::{Config, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = filegate::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        filegate::logging::init_console_only(&config.logging.level);
    }

    info!("filegate - sandboxed remote file manager");
    info!(root = %config.files.root_path, "serving file tree");
    if config.auth.enabled() {
        info!("authentication enabled");
    } else {
        warn!(
            "authentication disabled; set FILEGATE_AUTH_USERNAME and \
             FILEGATE_AUTH_PASSWORD to enable it"
        );
    }

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to start server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
