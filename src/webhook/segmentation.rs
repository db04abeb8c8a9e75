use serde::Serialize;
use serde_json::Value;

use crate::config::ServiceEndpoint;

use super::ServiceClient;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationRequest<'a> {
    pub project_name: &'a str,
    pub content: &'a str,
    pub lang: &'a str,
}

/// External segmentation service. Returns the raw response body; the
/// capture phase hands it to the payload normalizer, which treats any
/// unusable shape as the fallback branch.
pub struct SegmentationService {
    client: ServiceClient,
    endpoint: ServiceEndpoint,
}

impl SegmentationService {
    pub fn new(client: ServiceClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn segment(&self, request: &SegmentationRequest<'_>) -> anyhow::Result<Value> {
        self.client.post_json(&self.endpoint, request)
    }
}
