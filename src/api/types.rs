use serde::{Deserialize, Serialize};

use crate::inference::Label;

#[derive(Debug, Deserialize)]
pub struct NewsItem {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Prediction {
    pub prediction: Label,
}
