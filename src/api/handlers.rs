use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, error};

use crate::{
    api::error::ApiError,
    api::types::{NewsItem, Prediction},
    api::AppState,
    inference::classify,
    preprocess::preprocess_text,
};

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<NewsItem>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(news_item) = payload?;

    let news_text = preprocess_text(&state.nlp, &news_item.content);
    debug!(
        "preprocessed {} -> {} chars",
        news_item.content.chars().count(),
        news_text.chars().count()
    );

    let model = state.model.clone();
    let prediction = tokio::task::spawn_blocking(move || classify(model.as_ref(), &news_text))
        .await
        .map_err(|e| {
            error!("inference task aborted: {e}");
            ApiError::Inference(e.to_string())
        })?
        .map_err(|e| {
            error!("inference failed: {e:#}");
            ApiError::Inference(format!("{e:#}"))
        })?;

    Ok(Json(Prediction { prediction }))
}
