mod cultural;
mod segmentation;
mod store;
mod translation;

pub use cultural::{extract_findings, CulturalRequest, CulturalService};
pub use segmentation::{SegmentationRequest, SegmentationService};
pub use store::RecordStore;
pub use translation::{extract_translated, TranslationMeta, TranslationRequest, TranslationService};

use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Serialize;
use serde_json::Value;

use crate::config::ServiceEndpoint;

/// Shared blocking HTTP client. One instance is cloned into every service
/// wrapper; requests carry an optional bearer token per endpoint.
#[derive(Clone)]
pub struct ServiceClient {
    http: reqwest::blocking::Client,
}

impl ServiceClient {
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        // No timeout unless configured: a slow service keeps the action
        // in flight until it resolves or the connection drops.
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self { http })
    }

    /// POST a JSON body and return the response body as JSON. A body that
    /// is not valid JSON degrades to a JSON string so the per-service
    /// parsing strategies can still inspect it.
    pub fn post_json(
        &self,
        endpoint: &ServiceEndpoint,
        body: &impl Serialize,
    ) -> anyhow::Result<Value> {
        let mut req = self.http.post(&endpoint.url).json(body);
        if let Some(token) = &endpoint.auth_token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .with_context(|| format!("post {}", endpoint.url))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("service responded with HTTP {status}: {}", endpoint.url));
        }
        let text = resp.text().context("read response body")?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    pub fn get_json(&self, url: &str, query: &[(&str, &str)]) -> anyhow::Result<Value> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .with_context(|| format!("get {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("service responded with HTTP {status}: {url}"));
        }
        resp.json().context("parse response json")
    }
}
