// File: services/eximbay_backend/src/main.rs
use eximbay_backend::build_app;
use eximbay_common::logging;
use eximbay_config::{ensure_dotenv_loaded, load_config};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env may carry RUST_LOG as well as secrets
    ensure_dotenv_loaded();
    logging::init();

    let config = Arc::new(load_config()?);
    let app = build_app(config.clone())?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("Payment pages at http://{}/Payment/Ready and /Payment/Rebill", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
