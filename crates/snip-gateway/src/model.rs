use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    /// Missing and `null` both read as empty, which the shortener rejects.
    #[serde(default)]
    pub long_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub long_url: String,
    pub short_url: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
