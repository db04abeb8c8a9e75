use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{
    find_default_config, load_config, resolve_endpoint, resolve_store_url, AppConfig,
    ServiceEndpoint, CONFIG_ENV, CONFIG_FILENAME, DEFAULT_CULTURAL_URL, DEFAULT_SEGMENTATION_URL,
    DEFAULT_TRANSLATION_URL,
};
use crate::segment::ProjectMeta;
use crate::textutil::target_lang_from_context;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub workdir: PathBuf,
    pub config_path: PathBuf,

    pub project: ProjectMeta,

    pub segmentation: ServiceEndpoint,
    pub translation: ServiceEndpoint,
    pub cultural: ServiceEndpoint,
    pub store_url: String,

    pub offline: bool,
    pub tm_leverage: bool,

    pub trace_dir: PathBuf,
    pub trace_requests: bool,
    pub max_segments: Option<usize>,
    pub request_timeout: Option<Duration>,
}

impl PipelineConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn from_paths_and_args(
        input: &Path,
        output: &Path,
        config_path: Option<PathBuf>,
        project_name: Option<String>,
        context: Option<String>,
        asset_type: Option<String>,
        source_lang: Option<String>,
        target_lang: Option<String>,
        offline: bool,
        max_segments: Option<usize>,
    ) -> anyhow::Result<Self> {
        let workdir = input
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let workdir = workdir.canonicalize().unwrap_or(workdir);

        let cfg_file = config_path
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .or_else(|| find_default_config(&workdir, CONFIG_FILENAME));

        let mut file_cfg = AppConfig::default();
        if let Some(p) = cfg_file.as_ref() {
            if p.exists() {
                file_cfg = load_config(p)?;
            }
        }
        let cfg_path = cfg_file.unwrap_or_else(|| workdir.join(CONFIG_FILENAME));

        let name = project_name
            .or_else(|| file_cfg.pipeline.project_name.clone())
            .or_else(|| {
                input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| "Adaptation Project".to_string());
        let context = context
            .or_else(|| file_cfg.pipeline.context.clone())
            .unwrap_or_else(|| "Respiratory · DE".to_string());
        let asset_type = asset_type
            .or_else(|| file_cfg.pipeline.asset_type.clone())
            .unwrap_or_else(|| "email".to_string());
        let source_lang = source_lang
            .or_else(|| file_cfg.pipeline.default_language.clone())
            .unwrap_or_else(|| "EN".to_string());
        let target_lang = target_lang
            .or_else(|| file_cfg.pipeline.target_language.clone())
            .or_else(|| target_lang_from_context(&context))
            .unwrap_or_else(|| "DE".to_string());

        let output_dir = output
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| workdir.clone());
        let trace_dir = file_cfg
            .pipeline
            .trace_dir
            .clone()
            .unwrap_or_else(|| "_trace".to_string());
        let trace_dir = if Path::new(&trace_dir).is_absolute() {
            PathBuf::from(trace_dir)
        } else {
            output_dir.join(trace_dir)
        };
        let trace_requests = file_cfg.pipeline.trace_requests.unwrap_or(true);
        let tm_leverage = file_cfg.pipeline.tm_leverage.unwrap_or(true);
        let max_segments = max_segments
            .or(file_cfg.pipeline.max_segments)
            .filter(|n| *n > 0);
        let request_timeout = file_cfg
            .pipeline
            .request_timeout_secs
            .filter(|n| *n > 0)
            .map(Duration::from_secs);

        let segmentation = resolve_endpoint(
            &file_cfg.services.segmentation,
            "GLOCAL_SEGMENTATION_URL",
            "GLOCAL_SEGMENTATION_TOKEN",
            DEFAULT_SEGMENTATION_URL,
        );
        let translation = resolve_endpoint(
            &file_cfg.services.translation,
            "GLOCAL_TRANSLATION_URL",
            "GLOCAL_TRANSLATION_TOKEN",
            DEFAULT_TRANSLATION_URL,
        );
        let cultural = resolve_endpoint(
            &file_cfg.services.cultural,
            "GLOCAL_CULTURAL_URL",
            "GLOCAL_CULTURAL_TOKEN",
            DEFAULT_CULTURAL_URL,
        );
        let store_url = resolve_store_url(&file_cfg.store, "GLOCAL_STORE_URL");

        Ok(Self {
            workdir,
            config_path: cfg_path,
            project: ProjectMeta {
                name,
                context,
                asset_type,
                source_lang,
                target_lang,
            },
            segmentation,
            translation,
            cultural,
            store_url,
            offline,
            tm_leverage,
            trace_dir,
            trace_requests,
            max_segments,
            request_timeout,
        })
    }
}
