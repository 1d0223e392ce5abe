use once_cell::sync::Lazy;
use regex::Regex;

use crate::nlp::NlpPipeline;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());
static DIGIT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

pub fn remove_urls(text: &str) -> String {
    URL_PATTERN.replace_all(text, "").into_owned()
}

pub fn remove_digits(text: &str) -> String {
    DIGIT_PATTERN.replace_all(text, "").into_owned()
}

/// URLs out, digits out, lemmatize and filter, lowercase. Empty in, empty out.
pub fn preprocess_text(nlp: &NlpPipeline, news_text: &str) -> String {
    let text = remove_urls(news_text);
    let text = remove_digits(&text);
    let text = nlp.lemmatize_and_filter(&text);
    text.to_lowercase()
}
