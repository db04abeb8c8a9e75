use once_cell::sync::Lazy;
use regex::Regex;

static CONTEXT_LANG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"·\s*([A-Za-z-]+)").expect("context lang regex"));

/// Whitespace-split word count; empty tokens never count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Extract a target-language tag from a project context line like
/// "HIV/AIDS · DE".
pub fn target_lang_from_context(context: &str) -> Option<String> {
    CONTEXT_LANG_RE
        .captures(context)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Display heading for a segment: its first source line, else a positional
/// fallback.
pub fn first_line_title(source: &str, index: usize) -> String {
    let first = source.split(['\n', '\r']).next().unwrap_or("").trim();
    if first.is_empty() {
        format!("Section {index}")
    } else {
        first.to_string()
    }
}
