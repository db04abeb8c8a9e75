use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::segment::{Phase, ProjectMeta, Segment};

/// The document handed between phases and written as the final output:
/// project metadata, the per-phase workflow status, and the canonical
/// segment list with every accumulated annotation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffFile {
    pub schema: String,
    pub project_name: String,
    pub context: String,
    pub asset_type: String,
    pub source_lang: String,
    pub target_lang: String,
    pub phases: Vec<PhaseRecord>,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PhaseRecord {
    pub name: String,
    pub sub: String,
    pub status: String,
}

/// Build a snapshot after `phases_done` phases completed. The next
/// implemented phase shows as active; stub phases never activate.
pub fn build_handoff(project: &ProjectMeta, phases_done: usize, segments: &[Segment]) -> HandoffFile {
    let phases = Phase::ALL
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            let status = if i < phases_done {
                "done"
            } else if i == phases_done && !phase.is_stub() {
                "active"
            } else {
                "todo"
            };
            PhaseRecord {
                name: phase.name().to_string(),
                sub: phase.sub().to_string(),
                status: status.to_string(),
            }
        })
        .collect();

    HandoffFile {
        schema: "glocal.handoff.v1".to_string(),
        project_name: project.name.clone(),
        context: project.context.clone(),
        asset_type: project.asset_type.clone(),
        source_lang: project.source_lang.clone(),
        target_lang: project.target_lang.clone(),
        phases,
        segments: segments.to_vec(),
    }
}

pub fn write_handoff_file(path: &Path, handoff: &HandoffFile) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(handoff).context("serialize handoff")?;
    std::fs::write(path, json).with_context(|| format!("write handoff: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    fn project() -> ProjectMeta {
        ProjectMeta {
            name: "Campaign - DE Adaptation".into(),
            context: "HIV/AIDS · DE".into(),
            asset_type: "email".into(),
            source_lang: "EN".into(),
            target_lang: "DE".into(),
        }
    }

    #[test]
    fn phase_statuses_advance_with_completion() {
        let handoff = build_handoff(&project(), 1, &[]);
        assert_eq!(handoff.phases.len(), 7);
        assert_eq!(handoff.phases[0].status, "done");
        assert_eq!(handoff.phases[1].status, "active");
        assert_eq!(handoff.phases[2].status, "todo");
    }

    #[test]
    fn stub_phases_never_become_active() {
        let handoff = build_handoff(&project(), 4, &[]);
        assert_eq!(handoff.phases[3].status, "done");
        // Quality Intelligence is a stub and stays todo.
        assert_eq!(handoff.phases[4].status, "todo");
        assert_eq!(handoff.phases[6].status, "todo");
    }

    #[test]
    fn segments_are_carried_verbatim() {
        let seg = Segment::new("s1".into(), 1, "Hello".into(), "DE".into());
        let handoff = build_handoff(&project(), 0, &[seg.clone()]);
        assert_eq!(handoff.segments, vec![seg]);
        assert_eq!(handoff.schema, "glocal.handoff.v1");
    }
}
