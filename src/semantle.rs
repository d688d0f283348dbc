use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::game::{Lookup, ProviderError, SimilarityProvider, SimilarityRecord, FOUND_PERCENTILE};

const DEFAULT_BASE_URL: &str = "https://server.semantle.com";
const WORD_NOT_FOUND: &str = "Word not found";

/// Scored payload from `/similarity/{word}/{secret}/{lang}`.
#[derive(Debug, Deserialize)]
struct SimilarityPayload {
    similarity: f64,
    #[serde(default)]
    percentile: Option<i64>,
}

pub struct SemantleClient {
    client: reqwest::Client,
    base_url: Url,
    language: String,
}

impl SemantleClient {
    pub fn from_env() -> Result<Self> {
        let base_url = dotenv::var("SEMANTLE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let language = dotenv::var("SEMANTLE_LANGUAGE").unwrap_or_else(|_| "en".to_string());
        Self::new(&base_url, &language)
    }

    pub fn new(base_url: &str, language: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).context("Invalid SEMANTLE_BASE_URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("SEMANTLE_BASE_URL cannot be a base URL: {}", base_url);
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            language: language.to_string(),
        })
    }

    /// `{base}/similarity/{word}/{secret}/{lang}`, each segment percent-encoded.
    fn endpoint(&self, secret: &str, word: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["similarity", word, secret, self.language.as_str()]);
        }
        url
    }
}

/// Interpret a 200/404 body.
fn parse_body(body: &str) -> Result<Lookup, ProviderError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    if let Some(error) = json.get("error") {
        return match error.as_str() {
            Some(WORD_NOT_FOUND) => Ok(Lookup::UnknownWord),
            Some(message) => Err(ProviderError::Api(message.to_string())),
            None => Err(ProviderError::Api(error.to_string())),
        };
    }

    let payload: SimilarityPayload = serde_json::from_value(json.clone())
        .map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let percentile = payload
        .percentile
        .map(|p| {
            u16::try_from(p)
                .ok()
                .filter(|p| *p <= FOUND_PERCENTILE)
                .ok_or_else(|| ProviderError::Malformed(format!("percentile {} out of range", p)))
        })
        .transpose()?;

    Ok(Lookup::Found(SimilarityRecord {
        similarity: payload.similarity,
        percentile,
        raw: json,
    }))
}

#[async_trait]
impl SimilarityProvider for SemantleClient {
    async fn similarity(&self, secret: &str, word: &str) -> Result<Lookup, ProviderError> {
        let url = self.endpoint(secret, word);
        debug!(%url, "querying semantle");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if status != StatusCode::OK && status != StatusCode::NOT_FOUND {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_body(&body)
    }
}
