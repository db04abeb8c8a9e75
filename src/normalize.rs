use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::segment::Segment;
use crate::segmenter::DraftSegment;
use crate::textutil::{first_line_title, word_count};

static SEGMENT_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^segment\b").expect("segment key"));
static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("ordinal"));

/// Convert an external segmentation payload into the canonical segment
/// list, falling back to locally computed draft segments when the payload
/// carries no usable keyed container.
///
/// The result is sorted by index, deduplicated by construction, and free
/// of empty-source entries. Never fails; malformed payloads route to the
/// fallback branch.
pub fn normalize_external_payload(
    payload: &Value,
    fallback: &[DraftSegment],
    inbound_lang: &str,
) -> Vec<Segment> {
    let null = Value::Null;
    let first = match payload {
        Value::Array(items) => items.first().unwrap_or(&null),
        other => other,
    };
    let lang = resolve_language(first, inbound_lang);

    if let Some(output) = first.get("output").and_then(Value::as_object) {
        // Ordinal fallback counts qualifying keys before the empty-source
        // filter, so a blank "segment 2" still occupies position 2.
        let mut entries: Vec<Segment> = output
            .iter()
            .filter(|(key, _)| SEGMENT_KEY_RE.is_match(key))
            .enumerate()
            .map(|(pos, (key, value))| {
                let source = coerce_text(value);
                let index = ordinal_from_key(key).unwrap_or(pos + 1);
                Segment::new(key.clone(), index, source, lang.clone())
            })
            .filter(|s| !s.source.trim().is_empty())
            .collect();
        entries.sort_by_key(|s| s.index);
        if !entries.is_empty() {
            return entries;
        }
    }

    let mut out: Vec<Segment> = fallback
        .iter()
        .enumerate()
        .map(|(i, draft)| {
            let id = if draft.id.trim().is_empty() {
                format!("seg-{}", i + 1)
            } else {
                draft.id.clone()
            };
            let index = if draft.index >= 1 { draft.index } else { i + 1 };
            Segment::new(id, index, draft.text.clone(), lang.clone())
        })
        .filter(|s| !s.source.trim().is_empty())
        .collect();
    out.sort_by_key(|s| s.index);
    out
}

/// Re-normalize a segment list on entry to a phase: defend every field
/// against upstream gaps, drop empty sources, restore index order, and
/// enforce id uniqueness (first occurrence wins).
pub fn canonicalize_segments(raw: &[Segment], default_lang: &str) -> Vec<Segment> {
    let mut out: Vec<Segment> = raw
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            let index = if seg.index >= 1 { seg.index } else { i + 1 };
            let id = if seg.id.trim().is_empty() {
                format!("seg-{index}")
            } else {
                seg.id.clone()
            };
            let title = if seg.title.trim().is_empty() {
                first_line_title(&seg.source, index)
            } else {
                seg.title.clone()
            };
            let lang = if seg.lang.trim().is_empty() {
                default_lang.to_string()
            } else {
                seg.lang.clone()
            };
            Segment {
                id,
                index,
                title,
                source: seg.source.clone(),
                translated: seg.translated.clone(),
                adapted: seg.adapted.clone(),
                compliant: seg.compliant.clone(),
                words: word_count(&seg.source),
                status: seg.status,
                lang,
                compliance_score: seg.compliance_score,
            }
        })
        .filter(|s| !s.source.trim().is_empty())
        .collect();
    out.sort_by_key(|s| s.index);

    let mut seen: HashSet<String> = HashSet::new();
    out.retain(|s| seen.insert(s.id.clone()));
    out
}

/// Language tag priority: payload `lang` field, payload `meta.lang`,
/// payload `language`, the inbound parameter, then "EN".
pub fn resolve_language(first: &Value, inbound_lang: &str) -> String {
    first
        .get("lang")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            first
                .get("meta")
                .and_then(|m| m.get("lang"))
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
        })
        .or_else(|| {
            first
                .get("language")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            if inbound_lang.trim().is_empty() {
                "EN".to_string()
            } else {
                inbound_lang.to_string()
            }
        })
}

fn ordinal_from_key(key: &str) -> Option<usize> {
    ORDINAL_RE
        .find(key)
        .and_then(|m| m.as_str().parse::<usize>().ok())
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentStatus;
    use crate::segmenter::segment_content;
    use serde_json::json;

    #[test]
    fn keyed_payload_drops_blank_entries_and_sorts() {
        let payload = json!({
            "output": { "segment 1": "Hello", "segment 3": "World", "segment 2": "" }
        });
        let segs = normalize_external_payload(&payload, &[], "FR");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].index, 1);
        assert_eq!(segs[0].source, "Hello");
        assert_eq!(segs[1].index, 3);
        assert_eq!(segs[1].source, "World");
        assert!(segs.iter().all(|s| s.lang == "FR"));
    }

    #[test]
    fn one_element_array_payload_is_unwrapped() {
        let payload = json!([{ "output": { "segment 1": "Guten Tag" } }]);
        let segs = normalize_external_payload(&payload, &[], "EN");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].id, "segment 1");
        assert_eq!(segs[0].words, 2);
    }

    #[test]
    fn payload_language_beats_inbound_parameter() {
        let payload = json!({ "lang": "DE", "output": { "segment 1": "x" } });
        let segs = normalize_external_payload(&payload, &[], "FR");
        assert_eq!(segs[0].lang, "DE");

        let payload = json!({ "meta": { "lang": "JA" }, "output": { "segment 1": "x" } });
        let segs = normalize_external_payload(&payload, &[], "FR");
        assert_eq!(segs[0].lang, "JA");
    }

    #[test]
    fn keys_without_numbers_get_positional_ordinals() {
        let payload = json!({
            "output": { "segment one": "alpha", "segment two": "beta" }
        });
        let segs = normalize_external_payload(&payload, &[], "EN");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].index, 1);
        assert_eq!(segs[1].index, 2);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let payload = json!({
            "output": { "segment 1": "kept", "summary": "dropped", "note 2": "dropped" }
        });
        let segs = normalize_external_payload(&payload, &[], "EN");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].source, "kept");
    }

    #[test]
    fn unusable_payload_routes_to_fallback() {
        let drafts = segment_content("Subject: Hi\n\nDear Team,\n\nBody paragraph.");
        for payload in [
            Value::Null,
            json!({}),
            json!({ "output": "one flat string" }),
            json!({ "output": { "unrelated": "text" } }),
            json!([]),
        ] {
            let segs = normalize_external_payload(&payload, &drafts, "DE");
            assert_eq!(segs.len(), drafts.len());
            assert!(segs.iter().all(|s| s.lang == "DE"));
            assert!(segs.iter().all(|s| !s.source.trim().is_empty()));
        }
    }

    #[test]
    fn fallback_preserves_draft_ids_and_indices() {
        let drafts = segment_content("Subject: Hi\n\nDear Team,\n\nBody paragraph.");
        let segs = normalize_external_payload(&Value::Null, &drafts, "EN");
        assert_eq!(segs[0].id, "subject");
        assert_eq!(segs[1].id, "greeting");
        for (i, seg) in segs.iter().enumerate() {
            assert_eq!(seg.index, i + 1);
            assert_eq!(seg.words, word_count(&seg.source));
            assert_eq!(seg.status, SegmentStatus::Pending);
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let payload = json!({
            "output": { "segment 2": "two", "segment 1": "one" }
        });
        let a = normalize_external_payload(&payload, &[], "EN");
        let b = normalize_external_payload(&payload, &[], "EN");
        assert_eq!(a, b);
    }

    #[test]
    fn canonicalize_fills_gaps_and_orders() {
        let raw = vec![
            Segment {
                index: 0,
                id: String::new(),
                lang: String::new(),
                title: String::new(),
                ..Segment::new("x".into(), 2, "Second entry".into(), "EN".into())
            },
            Segment::new("a".into(), 1, "First entry".into(), "DE".into()),
            Segment::new("b".into(), 3, "   ".into(), "DE".into()),
        ];
        let segs = canonicalize_segments(&raw, "JA");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].id, "seg-1");
        assert_eq!(segs[0].index, 1);
        assert_eq!(segs[0].lang, "JA");
        assert_eq!(segs[0].title, "Second entry");
        assert_eq!(segs[1].id, "a");
    }

    #[test]
    fn canonicalize_enforces_unique_ids() {
        let raw = vec![
            Segment::new("dup".into(), 1, "first".into(), "EN".into()),
            Segment::new("dup".into(), 2, "second".into(), "EN".into()),
        ];
        let segs = canonicalize_segments(&raw, "EN");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].source, "first");
    }

    #[test]
    fn canonicalize_recomputes_words_from_source() {
        let mut seg = Segment::new("a".into(), 1, "three words here".into(), "EN".into());
        seg.words = 99;
        let segs = canonicalize_segments(&[seg], "EN");
        assert_eq!(segs[0].words, 3);
    }
}
