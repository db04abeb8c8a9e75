use std::collections::HashMap;

use crate::segment::{Segment, SegmentPatch, SegmentStatus};

/// Phase-local sparse overrides keyed by segment id. Mutators encode the
/// status transitions each review action implies; the canonical list is
/// only touched when the map is folded in at the phase boundary.
#[derive(Clone, Debug, Default)]
pub struct OverrideMap {
    patches: HashMap<String, SegmentPatch>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SegmentPatch> {
        self.patches.get(id)
    }

    fn patch_mut(&mut self, id: &str) -> &mut SegmentPatch {
        self.patches.entry(id.to_string()).or_default()
    }

    /// A translation arriving for a segment completes it; an empty result
    /// leaves it Pending.
    pub fn record_translation(&mut self, id: &str, translated: &str) {
        let patch = self.patch_mut(id);
        patch.translated = Some(translated.to_string());
        patch.status = Some(if translated.trim().is_empty() {
            SegmentStatus::Pending
        } else {
            SegmentStatus::Completed
        });
    }

    /// A failed translate action reverts the segment to Pending without
    /// touching any text field.
    pub fn record_translation_failure(&mut self, id: &str) {
        self.patch_mut(id).status = Some(SegmentStatus::Pending);
    }

    /// Editing the adapted text resets the segment to Pending; only an
    /// explicit review advances it again.
    pub fn record_adapted(&mut self, id: &str, adapted: &str) {
        let patch = self.patch_mut(id);
        patch.adapted = Some(adapted.to_string());
        patch.status = Some(SegmentStatus::Pending);
    }

    pub fn record_compliant(&mut self, id: &str, compliant: &str) {
        self.patch_mut(id).compliant = Some(compliant.to_string());
    }

    pub fn record_score(&mut self, id: &str, score: u32) {
        self.patch_mut(id).compliance_score = Some(score);
    }

    pub fn mark_reviewed(&mut self, id: &str) {
        self.patch_mut(id).status = Some(SegmentStatus::Reviewed);
    }

    pub fn mark_completed(&mut self, id: &str) {
        self.patch_mut(id).status = Some(SegmentStatus::Completed);
    }

    /// View of one segment with its pending patch applied, for display and
    /// progress computation before the boundary merge.
    pub fn resolved(&self, segment: &Segment) -> Segment {
        match self.patches.get(&segment.id) {
            Some(patch) => apply_patch(segment, patch),
            None => segment.clone(),
        }
    }
}

/// Fold overrides into the canonical list at a phase boundary. Fields the
/// patch does not carry keep their canonical values; order, ids and
/// indices are never altered. Merging with an empty map is the identity,
/// and merging the same map twice equals merging once.
pub fn merge_overrides(segments: &[Segment], overrides: &OverrideMap) -> Vec<Segment> {
    segments
        .iter()
        .map(|seg| overrides.resolved(seg))
        .collect()
}

fn apply_patch(segment: &Segment, patch: &SegmentPatch) -> Segment {
    let mut out = segment.clone();
    if let Some(translated) = &patch.translated {
        out.translated = translated.clone();
    }
    if let Some(adapted) = &patch.adapted {
        out.adapted = adapted.clone();
    }
    if let Some(compliant) = &patch.compliant {
        out.compliant = compliant.clone();
    }
    if let Some(status) = patch.status {
        out.status = status;
    }
    if let Some(score) = patch.compliance_score {
        out.compliance_score = Some(score);
    }
    out
}
