use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Lookup lemmatizer: surface form -> lemma.
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    table: HashMap<String, String>,
}

impl Lemmatizer {
    #[cfg(test)]
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Reads a JSON object mapping each surface form to its lemma.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let table: HashMap<String, String> = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Self { table })
    }

    /// Exact form first, then the lowercased form, then the form itself.
    pub fn lemma<'a>(&'a self, form: &'a str) -> &'a str {
        if let Some(lemma) = self.table.get(form) {
            return lemma;
        }
        let lower = form.to_lowercase();
        if lower != form {
            if let Some(lemma) = self.table.get(&lower) {
                return lemma;
            }
        }
        form
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
