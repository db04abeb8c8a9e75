use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ServiceEndpoint;

use super::ServiceClient;

static TRANSLATED_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)translat|output").expect("translated key"));

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest<'a> {
    pub segment_id: &'a str,
    pub index: usize,
    pub project_name: &'a str,
    pub source: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
    pub glossary_hints: &'a Map<String, Value>,
    pub meta: TranslationMeta<'a>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationMeta<'a> {
    pub context: &'a str,
    pub words: usize,
    pub tm_leverage: bool,
}

pub struct TranslationService {
    client: ServiceClient,
    endpoint: ServiceEndpoint,
}

impl TranslationService {
    pub fn new(client: ServiceClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn translate(&self, request: &TranslationRequest<'_>) -> anyhow::Result<Value> {
        self.client.post_json(&self.endpoint, request)
    }
}

/// Pull the translated text out of a free-form response. Strategies are
/// tried in order; every miss degrades to the next one and an exhausted
/// chain yields an empty string:
/// 1. array whose first element carries an `output` string;
/// 2. any string field on the first element (or the object itself) whose
///    key matches "translat" or "output", case-insensitively;
/// 3. object `translated` / `data.translated`;
/// 4. a raw text body.
pub fn extract_translated(body: &Value) -> String {
    match body {
        Value::Array(items) => {
            let Some(first) = items.first() else {
                return String::new();
            };
            if let Some(s) = first.get("output").and_then(Value::as_str) {
                return s.trim().to_string();
            }
            string_field_matching(first, &TRANSLATED_KEY_RE).unwrap_or_default()
        }
        Value::Object(map) => {
            if let Some(s) = map.get("translated").and_then(Value::as_str) {
                return s.trim().to_string();
            }
            if let Some(s) = map
                .get("data")
                .and_then(|d| d.get("translated"))
                .and_then(Value::as_str)
            {
                return s.trim().to_string();
            }
            string_field_matching(body, &TRANSLATED_KEY_RE).unwrap_or_default()
        }
        Value::String(s) => s.trim().to_string(),
        _ => String::new(),
    }
}

fn string_field_matching(value: &Value, key_re: &Regex) -> Option<String> {
    let map = value.as_object()?;
    for (key, val) in map {
        if let Some(s) = val.as_str() {
            if key_re.is_match(key) {
                return Some(s.trim().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_with_output_string_wins() {
        let body = json!([{ "output": "  Hallo Welt  " }]);
        assert_eq!(extract_translated(&body), "Hallo Welt");
    }

    #[test]
    fn matching_key_on_first_element_is_found() {
        let body = json!([{ "translation_de": "Guten Tag" }]);
        assert_eq!(extract_translated(&body), "Guten Tag");
        let body = json!([{ "Output": "Via output key" }]);
        assert_eq!(extract_translated(&body), "Via output key");
    }

    #[test]
    fn object_translated_and_nested_data_forms() {
        assert_eq!(
            extract_translated(&json!({ "translated": "Direkt" })),
            "Direkt"
        );
        assert_eq!(
            extract_translated(&json!({ "data": { "translated": "Verschachtelt" } })),
            "Verschachtelt"
        );
    }

    #[test]
    fn raw_text_body_is_used_verbatim() {
        assert_eq!(
            extract_translated(&Value::String("  plain text reply ".into())),
            "plain text reply"
        );
    }

    #[test]
    fn unusable_shapes_yield_empty() {
        assert_eq!(extract_translated(&json!([])), "");
        assert_eq!(extract_translated(&json!([{ "score": 3 }])), "");
        assert_eq!(extract_translated(&json!({ "score": 3 })), "");
        assert_eq!(extract_translated(&Value::Null), "");
    }

    #[test]
    fn non_string_matching_fields_are_skipped() {
        let body = json!({ "output": 42, "translation": "kept" });
        assert_eq!(extract_translated(&body), "kept");
    }
}
