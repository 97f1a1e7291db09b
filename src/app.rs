use std::sync::{Arc, Mutex};

use actix_web::web;
use tracing::{error, info};

use crate::infrastructure::config::ConfigService;
use crate::infrastructure::llm_clients::HttpProviderClient;
use crate::infrastructure::storage::ensure_images_dir;
use crate::interfaces::http::{start_server, HttpState};

pub async fn run() -> std::io::Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let config = ConfigService::load().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    ensure_images_dir(&config.images_dir)?;
    info!(
        host = %config.host,
        port = config.port,
        images_dir = %config.images_dir.display(),
        git_commit = config.git.enable_commit,
        git_push = config.git.enable_push,
        provider_configured = config.provider.is_configured(),
        "Starting upload server"
    );

    let logs = Arc::new(Mutex::new(Vec::new()));
    let state = HttpState::new(config, Arc::new(HttpProviderClient::new()), logs)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    start_server(web::Data::new(state))?.await
}
