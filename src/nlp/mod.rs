//! Word-level NLP pipeline: segmentation, stop words, punctuation and lemmas.
//!
//! Loaded once from a pipeline directory and read-only afterwards.

pub mod lemmatizer;
pub mod stopwords;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

pub use lemmatizer::Lemmatizer;
pub use stopwords::StopwordFilter;

pub const LEMMA_TABLE_FILE: &str = "lemma_lookup.json";
pub const EXTRA_STOPWORDS_FILE: &str = "stopwords.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub lemma: &'a str,
    pub is_stop: bool,
    pub is_punct: bool,
    pub is_space: bool,
}

#[derive(Debug, Clone)]
pub struct NlpPipeline {
    stopwords: StopwordFilter,
    lemmatizer: Lemmatizer,
}

impl NlpPipeline {
    pub fn new(stopwords: StopwordFilter, lemmatizer: Lemmatizer) -> Self {
        Self {
            stopwords,
            lemmatizer,
        }
    }

    /// Romanian stop words plus the directory's lemma table and optional extra stop words.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(anyhow!("NLP pipeline directory not found: {}", dir.display()));
        }

        let name = dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("nlp")
            .to_string();

        let mut stopwords = StopwordFilter::romanian();
        let extra = dir.join(EXTRA_STOPWORDS_FILE);
        if extra.exists() {
            let added = stopwords.extend_from_file(&extra)?;
            info!("{name}: {added} extra stop words from {}", extra.display());
        }

        let table = dir.join(LEMMA_TABLE_FILE);
        if !table.exists() {
            return Err(anyhow!(
                "{LEMMA_TABLE_FILE} not found under {}",
                dir.display()
            ));
        }
        let lemmatizer = Lemmatizer::from_json_file(&table)
            .with_context(|| format!("loading lemma table for '{name}'"))?;

        info!(
            "NLP pipeline '{name}' ready: {} stop words, {} lemma entries",
            stopwords.len(),
            lemmatizer.len()
        );

        Ok(Self::new(stopwords, lemmatizer))
    }

    pub fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Token<'a>> + 'a {
        text.split_word_bounds().map(move |segment| Token {
            text: segment,
            lemma: self.lemmatizer.lemma(segment),
            is_stop: self.stopwords.is_stopword(segment),
            is_punct: is_punct(segment),
            is_space: segment.chars().all(char::is_whitespace),
        })
    }

    /// Lemmas of the tokens that are neither stop words, punctuation nor whitespace,
    /// joined with single spaces.
    pub fn lemmatize_and_filter(&self, text: &str) -> String {
        self.tokens(text)
            .filter(|t| !t.is_stop && !t.is_punct && !t.is_space)
            .map(|t| t.lemma)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_punct(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(is_punctuation_char)
}

fn is_punctuation_char(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}'
                | '\u{00A7}'
                | '\u{00AB}'
                | '\u{00B6}'
                | '\u{00B7}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> NlpPipeline {
        NlpPipeline::new(
            StopwordFilter::from_list(&["și", "a", "de", "la", "în"]),
            Lemmatizer::from_pairs([("anunțat", "anunța"), ("măsurile", "măsură")]),
        )
    }

    #[test]
    fn flags_each_token_kind() {
        let nlp = pipeline();
        let toks: Vec<_> = nlp.tokens("Guvernul a anunțat, azi").collect();
        let texts: Vec<_> = toks.iter().map(|t| t.text).collect();
        assert_eq!(texts, ["Guvernul", " ", "a", " ", "anunțat", ",", " ", "azi"]);

        assert!(toks[1].is_space);
        assert!(toks[2].is_stop);
        assert_eq!(toks[4].lemma, "anunța");
        assert!(toks[5].is_punct);
        assert!(!toks[7].is_stop && !toks[7].is_punct && !toks[7].is_space);
    }

    #[test]
    fn filters_and_joins_lemmas() {
        let nlp = pipeline();
        assert_eq!(
            nlp.lemmatize_and_filter("Guvernul a anunțat măsurile de azi… „Breaking”!"),
            "Guvernul anunța măsură azi Breaking"
        );
    }

    #[test]
    fn stop_words_match_regardless_of_case() {
        let nlp = pipeline();
        assert_eq!(nlp.lemmatize_and_filter("Și apoi"), "apoi");
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        let nlp = pipeline();
        assert_eq!(nlp.lemmatize_and_filter(""), "");
        assert_eq!(nlp.lemmatize_and_filter(" \n\t "), "");
        assert_eq!(nlp.lemmatize_and_filter("?! -- ..."), "");
    }

    #[test]
    fn load_rejects_missing_directory() {
        assert!(NlpPipeline::load(Path::new("definitely/not/here")).is_err());
    }

    #[test]
    fn load_requires_lemma_table() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(EXTRA_STOPWORDS_FILE), "zilnic\n").unwrap();

        let err = NlpPipeline::load(dir.path()).err().expect("load should fail");
        assert!(err.to_string().contains(LEMMA_TABLE_FILE), "{err:#}");
    }

    #[test]
    fn load_reads_directory_resources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LEMMA_TABLE_FILE), r#"{"știrile": "știre"}"#).unwrap();
        std::fs::write(dir.path().join(EXTRA_STOPWORDS_FILE), "zilnic\n").unwrap();

        let nlp = NlpPipeline::load(dir.path()).unwrap();
        assert_eq!(nlp.lemmatize_and_filter("știrile zilnic"), "știre");
    }
}
