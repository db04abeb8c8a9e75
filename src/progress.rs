use std::io::{self, Write};
use std::time::Instant;

use crate::merge::OverrideMap;
use crate::segment::{Segment, SegmentStatus};

pub struct ConsoleProgress {
    enabled: bool,
    t0: Instant,
}

impl ConsoleProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            t0: Instant::now(),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        let ts = fmt_elapsed(self.t0.elapsed().as_secs_f64());
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{ts}] {}", msg.as_ref());
    }

    pub fn progress(&self, label: &str, current: usize, total: usize) {
        if !self.enabled {
            return;
        }
        let total = total.max(1);
        let current = current.min(total);
        let pct = (current as f64 / total as f64) * 100.0;
        let ts = fmt_elapsed(self.t0.elapsed().as_secs_f64());
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{ts}] {label} {current}/{total} ({pct:5.1}%)");
    }
}

fn fmt_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Word-based progress for the translation phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WordProgress {
    pub done: usize,
    pub total: usize,
}

impl WordProgress {
    pub fn pct(&self) -> u32 {
        percent(self.done, self.total)
    }
}

/// Count-based progress for the review and compliance phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReviewProgress {
    pub done: usize,
    pub total: usize,
}

impl ReviewProgress {
    pub fn pct(&self) -> u32 {
        percent(self.done, self.total)
    }
}

/// Words translated vs. total words. A segment counts as done once its
/// resolved translation is non-empty or its resolved status is Completed.
/// With zero total words the caller-supplied default is returned.
pub fn word_progress(
    segments: &[Segment],
    overrides: &OverrideMap,
    default: WordProgress,
) -> WordProgress {
    let mut done = 0usize;
    let mut total = 0usize;
    for seg in segments {
        let resolved = overrides.resolved(seg);
        total += resolved.words;
        if !resolved.translated.trim().is_empty() || resolved.status == SegmentStatus::Completed {
            done += resolved.words;
        }
    }
    if total == 0 {
        default
    } else {
        WordProgress { done, total }
    }
}

/// Segments whose resolved status is Reviewed or Completed, out of all
/// segments. Falls back to the caller default when the list is empty.
pub fn reviewed_progress(
    segments: &[Segment],
    overrides: &OverrideMap,
    default: ReviewProgress,
) -> ReviewProgress {
    let total = segments.len();
    if total == 0 {
        return default;
    }
    let done = segments
        .iter()
        .filter(|seg| overrides.resolved(seg).status.is_done())
        .count();
    ReviewProgress { done, total }
}

/// Segments whose resolved compliant text is non-empty after trim, out of
/// all segments. Falls back to the caller default when the list is empty.
pub fn approved_progress(
    segments: &[Segment],
    overrides: &OverrideMap,
    default: ReviewProgress,
) -> ReviewProgress {
    let total = segments.len();
    if total == 0 {
        return default;
    }
    let done = segments
        .iter()
        .filter(|seg| !overrides.resolved(seg).compliant.trim().is_empty())
        .count();
    ReviewProgress { done, total }
}

/// Integer percentage in [0, 100]; never divides by zero.
pub fn percent(done: usize, total: usize) -> u32 {
    let pct = (done as f64 / total.max(1) as f64) * 100.0;
    (pct.round() as u32).min(100)
}
