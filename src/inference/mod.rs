pub mod t5;

use anyhow::Result;
use serde::{Serialize, Serializer};

pub const TASK_PREFIX: &str = "clasifică știre: ";
pub const MAX_INPUT_TOKENS: usize = 512;
/// Upper bound on the generated sequence, decoder start token included.
pub const MAX_OUTPUT_LENGTH: usize = 10;

/// Anything that turns a prompt into decoded text.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Real,
    Fake,
    /// Decoded text that is neither label; passed through as-is.
    Other(String),
}

impl Label {
    pub fn from_decoded(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "fals" => Label::Fake,
            "real" => Label::Real,
            _ => Label::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Label::Real => "real",
            Label::Fake => "fake",
            Label::Other(raw) => raw,
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn build_prompt(preprocessed: &str) -> String {
    format!("{TASK_PREFIX}{preprocessed}")
}

pub fn classify(generator: &dyn TextGenerator, preprocessed: &str) -> Result<Label> {
    let decoded = generator.generate(&build_prompt(preprocessed))?;
    tracing::debug!("decoded model output: {decoded:?}");
    Ok(Label::from_decoded(&decoded))
}
