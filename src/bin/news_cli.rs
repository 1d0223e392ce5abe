use anyhow::{anyhow, Result};
use std::env;
use std::io::Read;

use stiri_main::client::{count_words, ModelClient, DEFAULT_API_BASE, MAX_WORD_COUNT};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let base = env::var("FAKENEWS_API").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

    let mut content = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if content.trim().is_empty() {
        std::io::stdin().read_to_string(&mut content)?;
    }
    if content.trim().is_empty() {
        return Err(anyhow!("no article text given (pass it as arguments or on stdin)"));
    }

    println!("{}/{MAX_WORD_COUNT} words", count_words(&content));

    let detection = ModelClient::new(base).get_detection(&content).await?;
    if detection.is_fake() {
        println!("Verdict: FAKE ({})", detection.prediction);
    } else {
        println!("Verdict: not fake ({})", detection.prediction);
    }

    Ok(())
}
