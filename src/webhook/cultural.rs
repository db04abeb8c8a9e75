use serde::Serialize;
use serde_json::Value;

use crate::analysis::CulturalFindings;
use crate::config::ServiceEndpoint;

use super::ServiceClient;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalRequest<'a> {
    pub segment_id: &'a str,
    pub source: &'a str,
    pub translated: &'a str,
    pub target_lang: &'a str,
}

pub struct CulturalService {
    client: ServiceClient,
    endpoint: ServiceEndpoint,
}

impl CulturalService {
    pub fn new(client: ServiceClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn analyze(&self, request: &CulturalRequest<'_>) -> anyhow::Result<Value> {
        self.client.post_json(&self.endpoint, request)
    }
}

/// Pull `{translation, problem, suggestion}` out of a free-form analysis
/// response. The payload may be an object, the same object serialized as
/// a JSON string inside `output`/`cultural_output`, or an arbitrary
/// string, which degrades to suggestion-only. Anything else yields empty
/// findings.
pub fn extract_findings(body: &Value) -> CulturalFindings {
    let null = Value::Null;
    let data = match body {
        Value::Array(items) => items.first().unwrap_or(&null),
        other => other,
    };
    let out = data
        .get("output")
        .filter(|v| !v.is_null())
        .or_else(|| data.get("cultural_output").filter(|v| !v.is_null()))
        .unwrap_or(data);

    match out {
        Value::String(s) => {
            if let Ok(parsed) = serde_json::from_str::<Value>(s) {
                let findings = findings_from_object(&parsed);
                if !findings.is_empty() {
                    return findings;
                }
            }
            CulturalFindings {
                suggestion: s.trim().to_string(),
                ..CulturalFindings::default()
            }
        }
        Value::Object(_) => findings_from_object(out),
        _ => CulturalFindings::default(),
    }
}

fn findings_from_object(value: &Value) -> CulturalFindings {
    CulturalFindings {
        translation: trimmed_field(value, "translation"),
        problem: trimmed_field(value, "problem"),
        suggestion: trimmed_field(value, "suggestion"),
    }
}

fn trimmed_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
