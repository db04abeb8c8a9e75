use once_cell::sync::Lazy;
use regex::Regex;

use crate::segment::Segment;

static BRAND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ofev|nintedanib").expect("brand"));
static RISK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)risk|warning|contraindication").expect("risk"));

/// Length-based compliance score with bonuses for brand naming and risk
/// language, clamped to [0, 100].
pub fn compliance_score(adapted: &str) -> u32 {
    let base = ((adapted.chars().count() as f64) / 3.0).round().min(100.0) as i64;
    let mut score = base;
    if BRAND_RE.is_match(adapted) {
        score += 10;
    }
    if RISK_RE.is_match(adapted) {
        score += 8;
    }
    score.clamp(0, 100) as u32
}

/// Text that approval promotes to the compliant field: the adapted text
/// when present, else the untouched source.
pub fn approved_text(segment: &Segment) -> String {
    if segment.adapted.trim().is_empty() {
        segment.source.clone()
    } else {
        segment.adapted.clone()
    }
}

pub fn is_approved(compliant: &str) -> bool {
    !compliant.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    #[test]
    fn score_grows_with_length_and_term_bonuses() {
        assert_eq!(compliance_score(""), 0);
        // 4 chars -> round(4/3) = 1, plus the risk bonus.
        assert_eq!(compliance_score("risk"), 9);
        // 30 chars of plain text -> 10, no bonuses.
        assert_eq!(compliance_score(&"a".repeat(30)), 10);
    }

    #[test]
    fn score_is_clamped_at_one_hundred() {
        let long = format!("{} Ofev carries a warning.", "x".repeat(400));
        assert_eq!(compliance_score(&long), 100);
    }

    #[test]
    fn brand_and_risk_terms_are_case_insensitive() {
        let text = "NINTEDANIB dosing: see CONTRAINDICATION list.";
        // 45 chars -> 15, +10 brand, +8 risk.
        assert_eq!(compliance_score(text), 33);
    }

    #[test]
    fn approval_prefers_adapted_over_source() {
        let mut seg = Segment::new("a".into(), 1, "source text".into(), "EN".into());
        assert_eq!(approved_text(&seg), "source text");
        seg.adapted = "adapted text".into();
        assert_eq!(approved_text(&seg), "adapted text");
        seg.adapted = "   ".into();
        assert_eq!(approved_text(&seg), "source text");
    }

    #[test]
    fn approval_predicate_requires_nonblank_text() {
        assert!(is_approved("done"));
        assert!(!is_approved(""));
        assert!(!is_approved("  \n "));
    }
}
