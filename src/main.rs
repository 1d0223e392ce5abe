use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stiri_main::{
    api::{self, AppState},
    config::ServiceConfig,
    inference::t5::{select_device, T5Service},
    nlp::NlpPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServiceConfig::from_env();
    info!("Starting fake-news classifier with {cfg:?}");

    // -----------------------------
    // Model, tokenizer, NLP pipeline
    // -----------------------------
    let device = select_device(&cfg.device)?;
    info!("Using device {device:?}");

    let model = T5Service::load(&cfg.model_dir, device)
        .with_context(|| format!("loading model from {}", cfg.model_dir.display()))?;
    let nlp = NlpPipeline::load(&cfg.nlp_dir)
        .with_context(|| format!("loading NLP pipeline from {}", cfg.nlp_dir.display()))?;

    let state = AppState::new(nlp, model);

    // -----------------------------
    // Router
    // -----------------------------
    let app = api::router()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state);

    info!("HTTP listening on http://{}", cfg.bind);
    info!("Classifier at POST http://{}/predict", cfg.bind);

    let listener = TcpListener::bind(&cfg.bind).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
