//! HTTP client for `/predict`, with the article length rule the mobile app enforces.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// ASCII whitespace only; a no-break space stays inside a word.
static WORD_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\n\x0B\x0C\r]+").unwrap());

pub const MAX_WORD_COUNT: usize = 550;
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

#[derive(Debug, Serialize)]
pub struct NewsRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
}

impl PredictionResponse {
    pub fn is_fake(&self) -> bool {
        self.prediction == "fake"
    }
}

/// Words of the trimmed text, split on runs of ASCII whitespace.
pub fn count_words(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    WORD_SEPARATOR.split(trimmed).count()
}

pub struct ModelClient {
    http: reqwest::Client,
    base_url: String,
}

impl ModelClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_detection(&self, content: &str) -> Result<PredictionResponse> {
        let words = count_words(content);
        if words > MAX_WORD_COUNT {
            return Err(anyhow!(
                "article has {words} words, the limit is {MAX_WORD_COUNT}"
            ));
        }

        let url = format!("{}/predict", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&NewsRequest { content })
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{url} returned {status}: {body}"));
        }

        response
            .json::<PredictionResponse>()
            .await
            .context("unexpected response body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{router, AppState};
    use crate::inference::TextGenerator;
    use crate::nlp::{Lemmatizer, NlpPipeline, StopwordFilter};
    use tokio::net::TcpListener;

    struct Always(&'static str);

    impl TextGenerator for Always {
        fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    async fn spawn_server(reply: &'static str) -> String {
        let nlp = NlpPipeline::new(StopwordFilter::empty(), Lemmatizer::identity());
        let app = router().with_state(AppState::new(nlp, Always(reply)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[test]
    fn counts_words_like_the_app() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t"), 0);
        assert_eq!(count_words("unu"), 1);
        assert_eq!(count_words("  unu   doi\ntrei\t patru "), 4);
    }

    #[test]
    fn no_break_space_does_not_split_words() {
        assert_eq!(count_words("a\u{00A0}b"), 1);
        assert_eq!(count_words("\u{00A0}a b\u{00A0}"), 2);
        assert_eq!(count_words("a \u{00A0} b"), 3);
    }

    #[tokio::test]
    async fn round_trips_against_the_service() {
        let base = spawn_server("fals").await;
        let client = ModelClient::new(base);
        let out = client.get_detection("O știre oarecare").await.unwrap();
        assert_eq!(out.prediction, "fake");
        assert!(out.is_fake());
    }

    #[tokio::test]
    async fn real_is_not_fake() {
        let base = spawn_server("real").await;
        let out = ModelClient::new(base).get_detection("text").await.unwrap();
        assert!(!out.is_fake());
    }

    #[tokio::test]
    async fn refuses_articles_over_the_word_limit() {
        let client = ModelClient::new("http://127.0.0.1:9");
        let long = vec!["cuvânt"; MAX_WORD_COUNT + 1].join(" ");
        let err = client.get_detection(&long).await.unwrap_err();
        assert!(err.to_string().contains("limit is 550"));
    }
}
