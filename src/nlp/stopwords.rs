//! Stop-word set used by the lemmatize/filter step.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};

#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Lowercased stop words.
    stopwords: HashSet<String>,
}

impl StopwordFilter {
    /// The bundled Romanian list.
    pub fn romanian() -> Self {
        let stopwords = get(LANGUAGE::Romanian)
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        Self { stopwords }
    }

    /// No filtering at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Adds every non-empty line of `path`; `#` starts a comment line.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let before = self.stopwords.len();
        for line in raw.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            self.stopwords.insert(word.to_lowercase());
        }
        Ok(self.stopwords.len() - before)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
