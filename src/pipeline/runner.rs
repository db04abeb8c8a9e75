use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::analysis::{build_analysis, CulturalFindings};
use crate::compliance::{approved_text, compliance_score};
use crate::merge::{merge_overrides, OverrideMap};
use crate::normalize::{canonicalize_segments, normalize_external_payload};
use crate::progress::{
    approved_progress, reviewed_progress, word_progress, ConsoleProgress, ReviewProgress,
    WordProgress,
};
use crate::segment::{Segment, SegmentStatus};
use crate::segmenter::segment_content;
use crate::webhook::{
    extract_findings, extract_translated, CulturalRequest, CulturalService, RecordStore,
    SegmentationRequest, SegmentationService, ServiceClient, TranslationMeta, TranslationRequest,
    TranslationService,
};

use super::config::PipelineConfig;
use super::handoff::{build_handoff, write_handoff_file};
use super::trace::TraceWriter;

pub struct GlocalPipeline {
    cfg: PipelineConfig,
    progress: ConsoleProgress,
    trace: TraceWriter,
    segmentation: Option<SegmentationService>,
    translation: Option<TranslationService>,
    cultural: Option<CulturalService>,
    store: Option<RecordStore>,
}

impl GlocalPipeline {
    pub fn new(cfg: PipelineConfig, progress: ConsoleProgress) -> anyhow::Result<Self> {
        let trace = TraceWriter::new(cfg.trace_dir.clone(), cfg.trace_requests)
            .unwrap_or_else(|_| TraceWriter::new(cfg.trace_dir.clone(), false).expect("trace"));

        let (segmentation, translation, cultural, store) = if cfg.offline {
            (None, None, None, None)
        } else {
            let client = ServiceClient::new(cfg.request_timeout)?;
            (
                Some(SegmentationService::new(
                    client.clone(),
                    cfg.segmentation.clone(),
                )),
                Some(TranslationService::new(
                    client.clone(),
                    cfg.translation.clone(),
                )),
                Some(CulturalService::new(client.clone(), cfg.cultural.clone())),
                Some(RecordStore::new(client, cfg.store_url.clone())),
            )
        };

        Ok(Self {
            cfg,
            progress,
            trace,
            segmentation,
            translation,
            cultural,
            store,
        })
    }

    pub fn run(&mut self, input: &Path, output: &Path) -> anyhow::Result<()> {
        self.progress
            .info(format!("Project: {}", self.cfg.project.name));
        self.progress.info(format!(
            "Language: {} -> {}",
            self.cfg.project.source_lang, self.cfg.project.target_lang
        ));

        let content = read_content(input)?;

        let mut segments = self.run_capture(&content)?;
        if let Some(max) = self.cfg.max_segments {
            let keep = max.min(segments.len());
            segments.truncate(keep);
            self.progress.info(format!("Max segments: {keep}"));
        }
        self.snapshot("capture", 1, &segments);

        segments = self.run_translate(segments)?;
        self.snapshot("after_translate", 2, &segments);

        segments = self.run_adapt(segments)?;
        self.snapshot("after_adapt", 3, &segments);

        segments = self.run_comply(segments)?;

        self.progress
            .info(format!("Write hand-off: {}", output.display()));
        let handoff = build_handoff(&self.cfg.project, 4, &segments);
        write_handoff_file(output, &handoff)?;
        self.progress.info("Done.");
        Ok(())
    }

    /// Phase 1: split the imported content into the canonical segment
    /// list, preferring the external segmentation service and falling
    /// back to the local heuristic.
    fn run_capture(&mut self, content: &str) -> anyhow::Result<Vec<Segment>> {
        let project = self.cfg.project.clone();
        self.progress.info("Capture: segmenting source content");

        let drafts = segment_content(content);
        self.progress
            .info(format!("Local segmenter: {} draft segments", drafts.len()));

        let payload = match &self.segmentation {
            Some(service) => {
                let request = SegmentationRequest {
                    project_name: &project.name,
                    content,
                    lang: &project.source_lang,
                };
                match service.segment(&request) {
                    Ok(body) => {
                        self.trace.write_exchange("capture", "segment", &request, &body);
                        body
                    }
                    Err(err) => {
                        self.progress.info(format!(
                            "[warn] segmentation service unavailable, using local fallback: {err:#}"
                        ));
                        Value::Null
                    }
                }
            }
            None => Value::Null,
        };

        let segments = normalize_external_payload(&payload, &drafts, &project.source_lang);
        if segments.is_empty() {
            self.progress.info("No segment present to display.");
        } else {
            self.progress
                .info(format!("Capture: {} segments", segments.len()));
        }

        if let Some(store) = &self.store {
            for seg in &segments {
                if let Err(err) = store.insert_segment(&project.name, seg.index, &seg.source) {
                    self.progress
                        .info(format!("[warn] store segment {}: {err:#}", seg.id));
                }
            }
        }

        Ok(segments)
    }

    /// Phase 2: one translation call per segment; failures leave the
    /// segment Pending and the run moves on.
    fn run_translate(&mut self, raw: Vec<Segment>) -> anyhow::Result<Vec<Segment>> {
        let project = self.cfg.project.clone();
        let segments = canonicalize_segments(&raw, &project.source_lang);
        let total = segments.len().max(1);
        let mut overrides = OverrideMap::new();

        for (i, seg) in segments.iter().enumerate() {
            self.progress.progress("translate", i + 1, total);
            if overrides.resolved(seg).status == SegmentStatus::Completed {
                continue;
            }
            let Some(service) = &self.translation else {
                continue;
            };

            let hints = self
                .store
                .as_ref()
                .map(|s| s.match_fragments(&seg.source, &project.target_lang))
                .unwrap_or_default();

            let request = TranslationRequest {
                segment_id: &seg.id,
                index: seg.index,
                project_name: &project.name,
                source: &seg.source,
                source_lang: &project.source_lang,
                target_lang: &project.target_lang,
                glossary_hints: &hints,
                meta: TranslationMeta {
                    context: &project.context,
                    words: seg.words,
                    tm_leverage: self.cfg.tm_leverage,
                },
            };

            match service.translate(&request) {
                Ok(body) => {
                    self.trace
                        .write_exchange("translate", &seg.id, &request, &body);
                    let translated = extract_translated(&body);
                    if translated.trim().is_empty() {
                        self.progress
                            .info(format!("[warn] empty translation for {}", seg.id));
                        overrides.record_translation_failure(&seg.id);
                        continue;
                    }
                    if let Some(store) = &self.store {
                        if let Err(err) = store.insert_translation(
                            &seg.source,
                            &translated,
                            &project.source_lang,
                            &project.target_lang,
                        ) {
                            self.progress
                                .info(format!("[warn] store translation {}: {err:#}", seg.id));
                        }
                        if let Err(err) = store.index_translation_memory(
                            &seg.source,
                            &translated,
                            &project.source_lang,
                            &project.target_lang,
                            &project.context,
                            "Global",
                        ) {
                            self.progress
                                .info(format!("[warn] index memory {}: {err:#}", seg.id));
                        }
                    }
                    overrides.record_translation(&seg.id, &translated);
                }
                Err(err) => {
                    self.progress
                        .info(format!("[warn] translate {} failed: {err:#}", seg.id));
                    overrides.record_translation_failure(&seg.id);
                }
            }
        }

        let words = word_progress(&segments, &overrides, WordProgress::default());
        self.progress.info(format!(
            "Translate: {}/{} words ({}%)",
            words.done,
            words.total,
            words.pct()
        ));
        Ok(merge_overrides(&segments, &overrides))
    }

    /// Phase 3: analyze each translation, adopt the suggested adaptation,
    /// and mark the segment reviewed. Service failures degrade to the
    /// deterministic mock report.
    fn run_adapt(&mut self, raw: Vec<Segment>) -> anyhow::Result<Vec<Segment>> {
        let project = self.cfg.project.clone();
        let segments = canonicalize_segments(&raw, &project.target_lang);
        let total = segments.len().max(1);
        let mut overrides = OverrideMap::new();

        for (i, seg) in segments.iter().enumerate() {
            self.progress.progress("adapt", i + 1, total);

            let findings = match &self.cultural {
                Some(service) => {
                    let request = CulturalRequest {
                        segment_id: &seg.id,
                        source: &seg.source,
                        translated: &seg.translated,
                        target_lang: &seg.lang,
                    };
                    match service.analyze(&request) {
                        Ok(body) => {
                            self.trace.write_exchange("adapt", &seg.id, &request, &body);
                            extract_findings(&body)
                        }
                        Err(err) => {
                            self.progress.info(format!(
                                "[warn] cultural analysis {} unavailable, using mock data: {err:#}",
                                seg.id
                            ));
                            CulturalFindings::default()
                        }
                    }
                }
                None => CulturalFindings::default(),
            };

            let analysis = build_analysis(seg, &findings);
            let _ = self
                .trace
                .write_json(&format!("adapt.{}.analysis.json", seg.id), &analysis);

            // Accepting the suggestion resets the status; the explicit
            // review below is what advances it.
            if let Some(suggestion) = analysis.primary_suggestion() {
                overrides.record_adapted(&seg.id, suggestion);
            }
            overrides.mark_reviewed(&seg.id);
        }

        let reviewed = reviewed_progress(&segments, &overrides, ReviewProgress::default());
        self.progress.info(format!(
            "Adapt: {}/{} reviewed ({}%)",
            reviewed.done,
            reviewed.total,
            reviewed.pct()
        ));
        Ok(merge_overrides(&segments, &overrides))
    }

    /// Phase 4: score the adapted text and promote it to the compliant
    /// field.
    fn run_comply(&mut self, raw: Vec<Segment>) -> anyhow::Result<Vec<Segment>> {
        let mut segments = canonicalize_segments(&raw, "EN");
        // Entering compliance review, a segment that was never culturally
        // adapted is reviewed on its translated text.
        for seg in &mut segments {
            if seg.adapted.trim().is_empty() {
                seg.adapted = seg.translated.clone();
            }
        }

        let total = segments.len().max(1);
        let mut overrides = OverrideMap::new();

        for (i, seg) in segments.iter().enumerate() {
            self.progress.progress("comply", i + 1, total);
            let score = compliance_score(&seg.adapted);
            overrides.record_score(&seg.id, score);
            overrides.record_compliant(&seg.id, &approved_text(seg));
        }

        let approved = approved_progress(&segments, &overrides, ReviewProgress::default());
        self.progress.info(format!(
            "Comply: {}/{} approved ({}%)",
            approved.done,
            approved.total,
            approved.pct()
        ));
        Ok(merge_overrides(&segments, &overrides))
    }

    fn snapshot(&self, stage: &str, phases_done: usize, segments: &[Segment]) {
        let handoff = build_handoff(&self.cfg.project, phases_done, segments);
        let path = self.trace.dir().join(format!("handoff.{stage}.json"));
        let _ = write_handoff_file(&path, &handoff);
    }
}

/// Decode imported content bytes: UTF-8 first (BOM tolerated), Latin-1
/// as a lossless fallback for legacy exports.
fn read_content(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read input: {}", path.display()))?;
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceEndpoint;
    use crate::segment::ProjectMeta;

    fn offline_config(dir: &Path) -> PipelineConfig {
        let endpoint = ServiceEndpoint {
            url: "http://127.0.0.1:1/unused".to_string(),
            auth_token: None,
        };
        PipelineConfig {
            workdir: dir.to_path_buf(),
            config_path: dir.join("glocal-orchestrator.toml"),
            project: ProjectMeta {
                name: "Field Update - DE Adaptation".into(),
                context: "HIV/AIDS · DE".into(),
                asset_type: "email".into(),
                source_lang: "EN".into(),
                target_lang: "DE".into(),
            },
            segmentation: endpoint.clone(),
            translation: endpoint.clone(),
            cultural: endpoint,
            store_url: "http://127.0.0.1:1".to_string(),
            offline: true,
            tm_leverage: true,
            trace_dir: dir.join("_trace"),
            trace_requests: false,
            max_segments: None,
            request_timeout: None,
        }
    }

    #[test]
    fn offline_run_writes_a_complete_handoff() {
        let dir = std::env::temp_dir().join("glocal-orchestrator-offline-test");
        std::fs::create_dir_all(&dir).expect("tmp dir");
        let input = dir.join("input.txt");
        std::fs::write(
            &input,
            "Subject: Welcome\n\nDear Sam,\n\nShort intro line.\n\nClosing paragraph with details.",
        )
        .expect("write input");
        let output = dir.join("handoff.json");

        let mut pipeline =
            GlocalPipeline::new(offline_config(&dir), ConsoleProgress::new(false)).expect("pipeline");
        pipeline.run(&input, &output).expect("run");

        let text = std::fs::read_to_string(&output).expect("read handoff");
        let json: Value = serde_json::from_str(&text).expect("handoff json");
        assert_eq!(json["schema"], "glocal.handoff.v1");
        assert_eq!(json["targetLang"], "DE");

        let segments = json["segments"].as_array().expect("segments");
        assert!(!segments.is_empty());
        for seg in segments {
            // Offline run: no translation, but every segment goes through
            // mock adaptation, review, and compliance approval.
            assert_eq!(seg["translated"], "");
            assert_eq!(seg["status"], "Reviewed");
            assert!(!seg["adapted"].as_str().expect("adapted").trim().is_empty());
            assert!(!seg["compliant"].as_str().expect("compliant").trim().is_empty());
            assert!(seg["complianceScore"].as_u64().expect("score") <= 100);
        }
    }
}
