use std::sync::Arc;

use axum::{routing::post, Router};

pub mod error;
pub mod handlers;
pub mod types;

use crate::inference::TextGenerator;
use crate::nlp::NlpPipeline;
use handlers::predict;

/// Built once at startup; handlers only read through it.
#[derive(Clone)]
pub struct AppState {
    pub nlp: Arc<NlpPipeline>,
    pub model: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(nlp: NlpPipeline, model: impl TextGenerator + 'static) -> Self {
        Self {
            nlp: Arc::new(nlp),
            model: Arc::new(model),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}
