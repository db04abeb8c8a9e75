use serde::{Deserialize, Serialize};

use crate::textutil::{first_line_title, word_count};

/// Review state of a segment within a phase. Unknown inputs parse to Pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentStatus {
    #[default]
    Pending,
    Reviewed,
    Completed,
}

impl SegmentStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "reviewed" => Self::Reviewed,
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
            Self::Completed => "Completed",
        }
    }

    /// Counts as reviewed for count-based phase progress.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Reviewed | Self::Completed)
    }
}

/// The canonical unit carried across all phases. Created once at capture,
/// only augmented afterwards; `words` is always derived from `source`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub index: usize,
    pub title: String,
    pub source: String,
    pub translated: String,
    pub adapted: String,
    pub compliant: String,
    pub words: usize,
    pub status: SegmentStatus,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<u32>,
}

impl Segment {
    pub fn new(id: String, index: usize, source: String, lang: String) -> Self {
        let words = word_count(&source);
        let title = first_line_title(&source, index);
        Self {
            id,
            index,
            title,
            source,
            translated: String::new(),
            adapted: String::new(),
            compliant: String::new(),
            words,
            status: SegmentStatus::Pending,
            lang,
            compliance_score: None,
        }
    }
}

/// Phase-local partial update for one segment. Absent fields never
/// overwrite the canonical value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SegmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<u32>,
}

impl SegmentPatch {
    pub fn is_empty(&self) -> bool {
        self.translated.is_none()
            && self.adapted.is_none()
            && self.compliant.is_none()
            && self.status.is_none()
            && self.compliance_score.is_none()
    }
}

/// The seven workflow phases, in pipeline order. Quality, DAM and Lineage
/// are recorded in hand-off documents but not executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Capture,
    Translate,
    Adapt,
    Comply,
    Quality,
    Dam,
    Lineage,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Capture,
        Phase::Translate,
        Phase::Adapt,
        Phase::Comply,
        Phase::Quality,
        Phase::Dam,
        Phase::Lineage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Capture => "Global Context Capture",
            Phase::Translate => "Smart TM Translation",
            Phase::Adapt => "Cultural Intelligence",
            Phase::Comply => "Regulatory Compliance",
            Phase::Quality => "Quality Intelligence",
            Phase::Dam => "DAM Integration",
            Phase::Lineage => "Integration Lineage",
        }
    }

    pub fn sub(&self) -> &'static str {
        match self {
            Phase::Capture => "Source content analysis",
            Phase::Translate => "AI-powered translation",
            Phase::Adapt => "Cultural adaptation",
            Phase::Comply => "Compliance validation",
            Phase::Quality => "Quality assurance",
            Phase::Dam => "Asset packaging",
            Phase::Lineage => "System integration",
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Phase::Quality | Phase::Dam | Phase::Lineage)
    }
}

/// Project-level metadata handed from phase to phase alongside the
/// segment list.
#[derive(Clone, Debug)]
pub struct ProjectMeta {
    pub name: String,
    /// Context line, e.g. "HIV/AIDS · DE"; the target language tag may be
    /// embedded after the separator.
    pub context: String,
    pub asset_type: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive_and_lenient() {
        assert_eq!(SegmentStatus::parse("REVIEWED"), SegmentStatus::Reviewed);
        assert_eq!(SegmentStatus::parse(" completed "), SegmentStatus::Completed);
        assert_eq!(SegmentStatus::parse("pending"), SegmentStatus::Pending);
        assert_eq!(SegmentStatus::parse("garbage"), SegmentStatus::Pending);
        assert_eq!(SegmentStatus::parse(""), SegmentStatus::Pending);
    }

    #[test]
    fn new_segment_derives_words_and_title() {
        let seg = Segment::new("s1".into(), 1, "First line\nmore text".into(), "EN".into());
        assert_eq!(seg.words, 4);
        assert_eq!(seg.title, "First line");
        assert_eq!(seg.status, SegmentStatus::Pending);
        assert!(seg.translated.is_empty());
        assert!(seg.compliance_score.is_none());
    }

    #[test]
    fn phase_table_matches_pipeline_order() {
        assert_eq!(Phase::ALL.len(), 7);
        assert!(!Phase::Comply.is_stub());
        assert!(Phase::Quality.is_stub());
        assert_eq!(Phase::Translate.name(), "Smart TM Translation");
    }
}
