use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// The triple a cultural analysis response may carry. Fields stay empty
/// when the service returned nothing usable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CulturalFindings {
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub suggestion: String,
}

impl CulturalFindings {
    pub fn is_empty(&self) -> bool {
        self.translation.is_empty() && self.problem.is_empty() && self.suggestion.is_empty()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneIssue {
    pub priority: String,
    pub translation: String,
    pub problem: String,
    pub suggestion: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneSection {
    pub id: String,
    pub title: String,
    pub score: u32,
    pub strengths: Vec<String>,
    pub issues: Vec<ToneIssue>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermIssue {
    pub id: String,
    pub term: String,
    pub issue: String,
    pub alternatives: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyReport {
    pub score: u32,
    pub approved_terms: Vec<String>,
    pub needs_review: Vec<TermIssue>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNote {
    pub label: String,
    pub status: String,
    pub text: String,
}

/// The reviewer-facing analysis report. Everything beyond the webhook
/// triple is deterministic mock intelligence keyed by target language.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalAnalysis {
    pub overall_score: u32,
    pub needs_status: String,
    pub sections: Vec<ToneSection>,
    pub terminology: TerminologyReport,
    pub visual: Vec<VisualNote>,
}

impl CulturalAnalysis {
    /// The suggestion a reviewer would accept into the adapted text.
    pub fn primary_suggestion(&self) -> Option<&str> {
        self.sections
            .first()
            .and_then(|sec| sec.issues.first())
            .map(|issue| issue.suggestion.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

pub fn build_analysis(segment: &Segment, findings: &CulturalFindings) -> CulturalAnalysis {
    let target_lang = segment.lang.to_uppercase();
    let source_upper = segment.source.to_uppercase();

    let translation = if findings.translation.trim().is_empty() {
        segment.translated.clone()
    } else {
        findings.translation.clone()
    };
    let problem = if findings.problem.trim().is_empty() {
        "Tone is slightly too formal for patient education.".to_string()
    } else {
        findings.problem.clone()
    };
    let suggestion = if findings.suggestion.trim().is_empty() {
        "Adjust phrasing to be more empathetic and accessible.".to_string()
    } else {
        findings.suggestion.clone()
    };

    CulturalAnalysis {
        overall_score: 80,
        needs_status: "Needs Review".to_string(),
        sections: vec![ToneSection {
            id: "tone".to_string(),
            title: "Cultural Tone & Messaging".to_string(),
            score: 70,
            strengths: vec![
                "Appropriate medical terminology used".to_string(),
                "Maintains professional register".to_string(),
            ],
            issues: vec![ToneIssue {
                priority: "Medium".to_string(),
                translation,
                problem,
                suggestion,
            }],
        }],
        terminology: terminology_for(&target_lang, &source_upper),
        visual: vec![
            VisualNote {
                label: "Medical Imagery Relevance".to_string(),
                status: "pass".to_string(),
                text: "Imagery aligns with local clinical settings.".to_string(),
            },
            VisualNote {
                label: "Color Palette Sensitivity".to_string(),
                status: "review".to_string(),
                text: "Ensure color coding for charts meets local accessibility standards."
                    .to_string(),
            },
        ],
    }
}

fn terminology_for(target_lang: &str, source_upper: &str) -> TerminologyReport {
    let mentions_hiv = source_upper.contains("HIV") || source_upper.contains("AIDS");
    let mut report = TerminologyReport {
        score: 85,
        approved_terms: Vec::new(),
        needs_review: Vec::new(),
    };

    if target_lang.contains("DE") {
        report.approved_terms = owned(&["Klinisch", "Behandlung", "Studie"]);
        if mentions_hiv {
            report.needs_review.push(TermIssue {
                id: "term_hiv_de".to_string(),
                term: "AIDS-Heilung".to_string(),
                issue: "'AIDS-Heilung' implies a cure, which is medically inaccurate. \
                        'HIV-Therapie' or 'Antiretrovirale Therapie' is preferred to describe \
                        ongoing management."
                    .to_string(),
                alternatives: owned(&["HIV-Therapie", "Antiretrovirale Therapie"]),
            });
        } else {
            report.needs_review.push(TermIssue {
                id: "term_gen_de".to_string(),
                term: "Klinische Exzellenz".to_string(),
                issue: "'Klinische Exzellenz' sounds like marketing jargon. In German medical \
                        communications, specifying the benefit (e.g., efficacy) is more \
                        compliant."
                    .to_string(),
                alternatives: owned(&["Klinische Wirksamkeit", "Therapeutischer Nutzen"]),
            });
        }
    } else if target_lang.contains("JA") || target_lang.contains("JP") {
        report.approved_terms = owned(&["アセット", "ソーシャルメディア投稿"]);
        report.needs_review.push(TermIssue {
            id: "term_social_ja".to_string(),
            term: "ソーシャルコンテンツ".to_string(),
            issue: "While 'ソーシャルコンテンツ' (social content) is generally understood, in a \
                    formal pharmaceutical context, a more precise phrasing might be preferred."
                .to_string(),
            alternatives: owned(&["ソーシャルメディア用コンテンツ", "広報コンテンツ (SNS向け)"]),
        });
        report.needs_review.push(TermIssue {
            id: "term_trend_ja".to_string(),
            term: "トレンドトピックの増幅".to_string(),
            issue: "'増幅' (amplification) can sound a bit aggressive or overly technical in \
                    some contexts."
                .to_string(),
            alternatives: owned(&["トレンドトピックの拡散", "トレンドトピックの活用"]),
        });
    } else if target_lang.contains("ZH") || target_lang.contains("CN") {
        report.approved_terms = owned(&["艾滋病", "临床", "治疗"]);
        if mentions_hiv {
            report.needs_review.push(TermIssue {
                id: "term_hiv_zh".to_string(),
                term: "艾滋病治疗".to_string(),
                issue: "Use 'HIV' (Human Immunodeficiency Virus) rather than 'AIDS' to avoid \
                        stigma. 'HIV治疗' is preferred."
                    .to_string(),
                alternatives: owned(&["HIV治疗", "HIV/AIDS治疗"]),
            });
        } else {
            report.needs_review.push(TermIssue {
                id: "term_gen_zh".to_string(),
                term: "临床卓越".to_string(),
                issue: "'临床卓越' is too generic. Specify the outcome.".to_string(),
                alternatives: owned(&["临床优势", "卓越临床实践"]),
            });
        }
    } else {
        report.approved_terms = owned(&["Clinical", "Therapy", "Study"]);
        report.needs_review.push(TermIssue {
            id: "term_gen_en".to_string(),
            term: "Perfect Cure".to_string(),
            issue: "Avoid absolute claims like 'Perfect'. Use statistical evidence.".to_string(),
            alternatives: owned(&["Significant Improvement", "High Efficacy"]),
        });
    }

    report
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
