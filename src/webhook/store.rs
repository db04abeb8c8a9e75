use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ServiceEndpoint;

use super::ServiceClient;

#[derive(Clone, Debug, Serialize)]
struct SegmentInsert<'a> {
    document_name: &'a str,
    segmented_no: String,
    description: &'a str,
}

#[derive(Clone, Debug, Serialize)]
struct TranslationInsert<'a> {
    source_text: &'a str,
    target_text: &'a str,
    source_language: &'a str,
    target_language: &'a str,
}

#[derive(Clone, Debug, Serialize)]
struct MemoryInsert<'a> {
    source_text: &'a str,
    target_text: &'a str,
    source_language: &'a str,
    target_language: &'a str,
    domain_context: &'a str,
    match_type: &'a str,
    quality_score: u32,
    confidence_level: f64,
    usage_count: u32,
    market: &'a str,
}

/// Insert-only REST backend. Callers treat every insert as
/// fire-and-forget: failures are logged by the caller and never retried.
pub struct RecordStore {
    client: ServiceClient,
    base_url: String,
}

impl RecordStore {
    pub fn new(client: ServiceClient, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> ServiceEndpoint {
        ServiceEndpoint {
            url: format!("{}{path}", self.base_url),
            auth_token: None,
        }
    }

    pub fn insert_segment(
        &self,
        document_name: &str,
        index: usize,
        source: &str,
    ) -> anyhow::Result<()> {
        let record = SegmentInsert {
            document_name,
            segmented_no: format!("Segment {index}"),
            description: source,
        };
        self.client
            .post_json(&self.endpoint("/api/segmented-content"), &record)?;
        Ok(())
    }

    pub fn insert_translation(
        &self,
        source_text: &str,
        target_text: &str,
        source_language: &str,
        target_language: &str,
    ) -> anyhow::Result<()> {
        let record = TranslationInsert {
            source_text,
            target_text,
            source_language,
            target_language,
        };
        self.client
            .post_json(&self.endpoint("/api/translated-content"), &record)?;
        Ok(())
    }

    /// Index a fresh machine translation so later runs can leverage it as
    /// a match.
    pub fn index_translation_memory(
        &self,
        source_text: &str,
        target_text: &str,
        source_language: &str,
        target_language: &str,
        domain_context: &str,
        market: &str,
    ) -> anyhow::Result<()> {
        let record = MemoryInsert {
            source_text,
            target_text,
            source_language,
            target_language,
            domain_context,
            match_type: "machine",
            quality_score: 70,
            confidence_level: 0.85,
            usage_count: 1,
            market,
        };
        self.client
            .post_json(&self.endpoint("/api/translation-memory"), &record)?;
        Ok(())
    }

    /// Best-effort glossary/TM hint lookup for one source text. Any
    /// failure, including an unreachable store, degrades to an empty hint
    /// map.
    pub fn match_fragments(&self, text: &str, target_lang: &str) -> Map<String, Value> {
        let url = format!("{}/api/translation-memory/match-fragments", self.base_url);
        match self
            .client
            .get_json(&url, &[("text", text), ("target_lang", target_lang)])
        {
            Ok(body) => body
                .get("matches")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            Err(_) => Map::new(),
        }
    }
}
