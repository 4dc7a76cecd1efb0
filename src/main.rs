use heartnx::{config, model, preprocessing::scaling::FeatureScaler, server, telemetry};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load Config
    let config_path = std::env::var(config::CONFIG_PATH_ENV)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let config = config::AppConfig::load(&config_path)?;

    // 2. Init logging, metrics and the ORT environment
    telemetry::init_tracing(&config.logging)?;
    let metrics_handle = telemetry::init_metrics()?;
    if let Err(e) = model::loader::init_ort() {
        error!("Failed to initialize ONNX Runtime: {}", e);
        return Err(e.into());
    }

    // 3. Load and warm up the model; the server never starts without it
    let classifier = match model::loader::load_classifier(
        &config.model.path,
        config.model.intra_threads,
    ) {
        Ok(classifier) => {
            info!("Model loaded successfully");
            classifier
        }
        Err(e) => {
            error!("Failed to load model: {}", e);
            return Err(e.into());
        }
    };
    let scaler = FeatureScaler::from_config(&config.scaling)?;
    info!(scaling = ?config.scaling.mode, "feature scaling configured");

    // 4. Create Router
    let app = server::routes::create_router(Arc::new(classifier), scaler, metrics_handle);

    // 5. Bind & Serve
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
