use tracing::{error, info};

use healthdocs::web::WebServer;
use healthdocs::{Config, Database, DocumentStorage};

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
    if let Err(e) = healthdocs::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        healthdocs::logging::init_console_only(&config.logging.level);
    }

    info!("HealthDocs - PDF document management");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            std::process::exit(1);
        }
    };

    let storage = match DocumentStorage::new(&config.files.media_root) {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to prepare media root {}: {}", config.files.media_root, e);
            std::process::exit(1);
        }
    };
    info!(
        "Documents stored under {} (max upload {})",
        storage.documents_dir().display(),
        healthdocs::format_size(config.files.max_upload_size_bytes())
    );

    let server = match WebServer::new(&config, db, storage) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
