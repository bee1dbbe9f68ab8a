use std::path::Path;

use anyhow::{anyhow, Context};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://otx.alienvault.com";
const SUBSCRIBED_PATH: &str = "/api/v1/pulses/subscribed";
const API_KEY_HEADER: &str = "X-OTX-API-KEY";

#[derive(Debug, Deserialize)]
pub struct PulseFeed {
    pub results: Vec<RawPulse>,
}

#[derive(Debug, Deserialize)]
pub struct RawPulse {
    pub id: String,
    pub name: String,
    pub indicators: Vec<RawIndicator>,
}

#[derive(Debug, Deserialize)]
pub struct RawIndicator {
    // `type` is a keyword; the rename keeps the wire name intact.
    #[serde(rename = "type")]
    pub indicator_type: String,
    pub indicator: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created: String,
}

pub struct OtxClient {
    client: reqwest::Client,
    base: String,
    api_key: Option<String>,
}

impl OtxClient {
    pub fn new(base: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
            api_key,
        }
    }

    /// One GET against the subscribed-pulses endpoint, first page only.
    /// Without a configured key the request goes out unauthenticated and the
    /// feed's rejection comes back through the ordinary failure path.
    pub async fn fetch_subscribed(&self) -> anyhow::Result<PulseFeed> {
        let url = format!("{}{}", self.base, SUBSCRIBED_PATH);
        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("OTX feed returned {status}"));
        }

        response
            .json::<PulseFeed>()
            .await
            .context("OTX response did not match the expected pulse shape")
    }
}

pub fn read_saved(path: &Path) -> anyhow::Result<PulseFeed> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} did not match the expected pulse shape", path.display()))
}
