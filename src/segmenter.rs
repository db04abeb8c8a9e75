use once_cell::sync::Lazy;
use regex::Regex;

static SUBJECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^subject\b").expect("subject"));
static SUBJECT_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^subject:\s*").expect("subject label"));
static GREETING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^dear\b").expect("greeting"));
static PARA_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("para split"));

/// Minimum character count for a paragraph to qualify as the executive
/// summary; shorter texts fall back to the first paragraph in scan range.
const SUMMARY_MIN_CHARS: usize = 160;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Subject,
    Greeting,
    Summary,
    Paragraph,
}

impl SegmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            SegmentKind::Subject => "Subject Line",
            SegmentKind::Greeting => "Greeting",
            SegmentKind::Summary => "Executive Summary",
            SegmentKind::Paragraph => "Paragraph",
        }
    }
}

/// One locally detected segment, before canonicalization.
#[derive(Clone, Debug, PartialEq)]
pub struct DraftSegment {
    pub id: String,
    pub index: usize,
    pub kind: SegmentKind,
    pub text: String,
    pub length: usize,
}

impl DraftSegment {
    fn new(id: String, index: usize, kind: SegmentKind, text: String) -> Self {
        let length = text.chars().count();
        Self {
            id,
            index,
            kind,
            text,
            length,
        }
    }
}

/// Heuristic fallback splitter used when no external segmentation result
/// is available. Pure function of the input text; always returns a
/// (possibly empty) ordered list with contiguous 1-based indices.
pub fn segment_content(text: &str) -> Vec<DraftSegment> {
    let lines: Vec<String> = text.split('\n').map(|l| l.trim().to_string()).collect();

    let mut segments: Vec<DraftSegment> = Vec::new();
    let mut idx = 1usize;

    // Subject: first "subject"-prefixed line, else first non-empty line.
    let subject_line = lines
        .iter()
        .find(|l| SUBJECT_RE.is_match(l))
        .or_else(|| lines.iter().find(|l| !l.is_empty()));
    if let Some(line) = subject_line.filter(|l| !l.is_empty()) {
        let subject_text = SUBJECT_LABEL_RE.replace(line, "").into_owned();
        segments.push(DraftSegment::new(
            "subject".to_string(),
            idx,
            SegmentKind::Subject,
            subject_text,
        ));
        idx += 1;
    }

    // Greeting: first "dear"-prefixed line, if any.
    let greet_pos = lines.iter().position(|l| GREETING_RE.is_match(l));
    if let Some(pos) = greet_pos {
        segments.push(DraftSegment::new(
            "greeting".to_string(),
            idx,
            SegmentKind::Greeting,
            lines[pos].clone(),
        ));
        idx += 1;
    }

    // Scan range for summary and body paragraphs: strictly after the
    // greeting line, or after the first line when no greeting was found.
    let after: &[String] = match greet_pos {
        Some(pos) => &lines[pos + 1..],
        None if lines.len() > 1 => &lines[1..],
        None => &[],
    };

    let summary = pick_paragraph(after, SUMMARY_MIN_CHARS);
    if let Some(para) = &summary {
        segments.push(DraftSegment::new(
            "execsum".to_string(),
            idx,
            SegmentKind::Summary,
            para.clone(),
        ));
        idx += 1;
    }

    // Remaining paragraphs, excluding the exact summary text.
    let mut para_no = 0usize;
    for para in paragraphs_of(after) {
        if Some(&para) == summary.as_ref() {
            continue;
        }
        segments.push(DraftSegment::new(
            format!("para-{para_no}"),
            idx,
            SegmentKind::Paragraph,
            para,
        ));
        idx += 1;
        para_no += 1;
    }

    segments
}

fn paragraphs_of(lines: &[String]) -> Vec<String> {
    if lines.is_empty() {
        return Vec::new();
    }
    let joined = lines.join("\n");
    PARA_SPLIT_RE
        .split(&joined)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// First paragraph in `lines` reaching `min_chars`, else the first
/// non-empty paragraph, else None.
fn pick_paragraph(lines: &[String], min_chars: usize) -> Option<String> {
    let paras = paragraphs_of(lines);
    paras
        .iter()
        .find(|p| p.chars().count() >= min_chars)
        .cloned()
        .or_else(|| paras.first().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL: &str = "Subject: Welcome\n\nDear Sam,\n\nThis is a short line.\n\nThis paragraph has enough characters to qualify as the executive summary because it exceeds one hundred and sixty characters in total length for sure, definitely, absolutely, really.";

    #[test]
    fn labeled_email_splits_into_four_segments() {
        let segs = segment_content(EMAIL);
        assert_eq!(segs.len(), 4);

        assert_eq!(segs[0].kind, SegmentKind::Subject);
        assert_eq!(segs[0].kind.label(), "Subject Line");
        assert_eq!(segs[0].text, "Welcome");
        assert_eq!(segs[1].kind, SegmentKind::Greeting);
        assert_eq!(segs[1].text, "Dear Sam,");
        assert_eq!(segs[2].kind, SegmentKind::Summary);
        assert!(segs[2].text.starts_with("This paragraph has enough characters"));
        assert_eq!(segs[3].kind, SegmentKind::Paragraph);
        assert_eq!(segs[3].text, "This is a short line.");
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(segment_content("").is_empty());
        assert!(segment_content("\n\n\n").is_empty());
    }

    #[test]
    fn single_unmarked_line_becomes_subject_only() {
        let segs = segment_content("Quarterly update for the field team");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].kind, SegmentKind::Subject);
        assert_eq!(segs[0].text, "Quarterly update for the field team");
    }

    #[test]
    fn indices_are_contiguous_and_lengths_match_text() {
        let segs = segment_content(EMAIL);
        for (i, seg) in segs.iter().enumerate() {
            assert_eq!(seg.index, i + 1);
            assert_eq!(seg.length, seg.text.chars().count());
        }
    }

    #[test]
    fn short_paragraphs_still_produce_a_summary() {
        let segs = segment_content("Title line\n\nDear Dr. Weber,\n\nShort body.");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[2].kind, SegmentKind::Summary);
        assert_eq!(segs[2].text, "Short body.");
    }

    #[test]
    fn no_greeting_scans_after_first_line() {
        let segs = segment_content("Headline\n\nFirst paragraph under it.\n\nSecond paragraph.");
        assert_eq!(segs[0].kind, SegmentKind::Subject);
        assert_eq!(segs[0].text, "Headline");
        // No greeting: summary picked from paragraphs after line one.
        assert_eq!(segs[1].kind, SegmentKind::Summary);
        assert_eq!(segs[1].text, "First paragraph under it.");
        assert_eq!(segs[2].kind, SegmentKind::Paragraph);
        assert_eq!(segs[2].text, "Second paragraph.");
    }

    #[test]
    fn crlf_input_is_handled() {
        let segs = segment_content("Subject: Hi\r\n\r\nDear Ana,\r\n\r\nBody text here.");
        assert_eq!(segs[0].text, "Hi");
        assert_eq!(segs[1].text, "Dear Ana,");
        assert_eq!(segs[2].text, "Body text here.");
    }
}
