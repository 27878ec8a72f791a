use std::time::Duration;

use thiserror::Error;

/// Outcome of an image fetch, as far as the app cares: it either has bytes
/// to offer or it falls back to text-only presentation. Never fatal.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image not found")]
    NotFound,
    #[error("image access denied")]
    AuthFailure,
    #[error("image fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fetches question images from a remote source, optionally authenticating
/// with a bearer token from the config.
pub struct ImageProvider {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl ImageProvider {
    pub fn new(token: Option<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self { client, token }
    }

    pub fn fetch(&self, reference: &str) -> Result<Vec<u8>, ImageError> {
        let mut request = self.client.get(reference);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send()?;

        match response.status() {
            s if s.is_success() => Ok(response.bytes()?.to_vec()),
            reqwest::StatusCode::NOT_FOUND => Err(ImageError::NotFound),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(ImageError::AuthFailure)
            }
            _ => Err(ImageError::NotFound),
        }
    }
}
