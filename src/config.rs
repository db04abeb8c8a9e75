use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "glocal-orchestrator.toml";
pub const CONFIG_ENV: &str = "GLOCAL_ORCHESTRATOR_CONFIG";

pub const DEFAULT_SEGMENTATION_URL: &str = "http://127.0.0.1:8033/webhook/segment";
pub const DEFAULT_TRANSLATION_URL: &str = "http://127.0.0.1:8033/webhook/translate";
pub const DEFAULT_CULTURAL_URL: &str = "http://127.0.0.1:8010/webhook/cultural";
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub services: ServicesSection,
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PipelineSection {
    #[serde(default)]
    pub project_name: Option<String>,

    /// Project context line; a trailing "· XX" tag doubles as the target
    /// language when none is set explicitly.
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub asset_type: Option<String>,

    #[serde(default)]
    pub default_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,

    #[serde(default)]
    pub trace_dir: Option<String>,
    #[serde(default)]
    pub trace_requests: Option<bool>,

    /// Optional dev-only limiter: process at most N segments.
    #[serde(default)]
    pub max_segments: Option<usize>,

    #[serde(default)]
    pub tm_leverage: Option<bool>,

    /// Per-request timeout in seconds; unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ServicesSection {
    #[serde(default)]
    pub segmentation: EndpointSection,
    #[serde(default)]
    pub translation: EndpointSection,
    #[serde(default)]
    pub cultural: EndpointSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct EndpointSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct StoreSection {
    #[serde(default)]
    pub url: Option<String>,
}

/// One resolved external service address.
#[derive(Clone, Debug)]
pub struct ServiceEndpoint {
    pub url: String,
    pub auth_token: Option<String>,
}

pub fn find_default_config(workdir: &Path, filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, filename, 8) {
            return Some(p);
        }
    }
    if let Some(p) = find_file_upwards(workdir, filename, 8) {
        return Some(p);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, filename, 10) {
                return Some(p);
            }
        }
    }
    None
}

fn find_file_upwards(start: &Path, filename: &str, max_depth: usize) -> Option<PathBuf> {
    let mut dir = Some(start.to_path_buf());
    for _ in 0..max_depth {
        let d = dir?;
        let candidate = d.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = d.parent().map(|p| p.to_path_buf());
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text).context("parse config toml")?;
    Ok(cfg)
}

/// Resolve one service endpoint with precedence env var > config file >
/// built-in default (CLI overrides, when any, are applied by the caller).
pub fn resolve_endpoint(
    section: &EndpointSection,
    env_url: &str,
    env_token: &str,
    default_url: &str,
) -> ServiceEndpoint {
    let url = std::env::var(env_url)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| section.url.clone().filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| default_url.to_string());
    let auth_token = std::env::var(env_token)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| section.auth_token.clone().filter(|s| !s.trim().is_empty()));
    ServiceEndpoint { url, auth_token }
}

pub fn resolve_store_url(section: &StoreSection, env_url: &str) -> String {
    std::env::var(env_url)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| section.url.clone().filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_STORE_URL.to_string())
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# glocal-orchestrator configuration

[pipeline]
# project_name = "HCP Clinical Insights Email Campaign - DE Adaptation"
# context = "HIV/AIDS · DE"
# asset_type = "email"
# default_language = "EN"
# target_language = "DE"
# trace_dir = "_trace"
# trace_requests = true
# max_segments = 50
# tm_leverage = true
# request_timeout_secs = 120

[services.segmentation]
# url = "http://127.0.0.1:8033/webhook/segment"
# auth_token = ""

[services.translation]
# url = "http://127.0.0.1:8033/webhook/translate"
# auth_token = ""

[services.cultural]
# url = "http://127.0.0.1:8010/webhook/cultural"
# auth_token = ""

[store]
# url = "http://127.0.0.1:5000"
"#;

/// Write a commented default config file, refusing to overwrite unless
/// forced.
pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create config dir: {}", dir.display()))?;
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() && !force {
        return Err(anyhow!(
            "config already exists (use --force to overwrite): {}",
            path.display()
        ));
    }
    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("write config: {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses_back() {
        let cfg: AppConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template toml");
        assert!(cfg.pipeline.project_name.is_none());
        assert!(cfg.services.segmentation.url.is_none());
    }

    #[test]
    fn partial_config_fills_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [pipeline]
            target_language = "JA"

            [services.translation]
            url = "http://translate.local/hook"
            auth_token = "secret"
            "#,
        )
        .expect("toml");
        assert_eq!(cfg.pipeline.target_language.as_deref(), Some("JA"));
        assert_eq!(
            cfg.services.translation.url.as_deref(),
            Some("http://translate.local/hook")
        );
        assert!(cfg.services.cultural.url.is_none());
        assert!(cfg.store.url.is_none());
    }

    #[test]
    fn endpoint_resolution_prefers_file_over_default() {
        let section = EndpointSection {
            url: Some("http://cfg.local".to_string()),
            auth_token: None,
        };
        // Env var names that are never set in the test environment.
        let ep = resolve_endpoint(
            &section,
            "GLOCAL_TEST_UNSET_URL",
            "GLOCAL_TEST_UNSET_TOKEN",
            "http://default.local",
        );
        assert_eq!(ep.url, "http://cfg.local");
        assert!(ep.auth_token.is_none());

        let ep = resolve_endpoint(
            &EndpointSection::default(),
            "GLOCAL_TEST_UNSET_URL",
            "GLOCAL_TEST_UNSET_TOKEN",
            "http://default.local",
        );
        assert_eq!(ep.url, "http://default.local");
    }
}
