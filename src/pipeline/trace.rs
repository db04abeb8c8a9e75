use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

/// Writes webhook exchanges and hand-off snapshots for inspection. When
/// disabled, every write is a no-op.
pub struct TraceWriter {
    dir: PathBuf,
    enabled: bool,
}

impl TraceWriter {
    pub fn new(dir: PathBuf, enabled: bool) -> anyhow::Result<Self> {
        if enabled {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create trace dir: {}", dir.display()))?;
        }
        Ok(Self { dir, enabled })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_named_text(&self, name: &str, text: &str) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.dir.join(sanitize_filename(name));
        std::fs::write(&path, text).with_context(|| format!("write trace: {}", path.display()))?;
        Ok(())
    }

    pub fn write_json(&self, name: &str, value: &impl Serialize) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(value).context("serialize trace json")?;
        self.write_named_text(name, &json)
    }

    /// One request/response pair for a per-segment service call.
    pub fn write_exchange(
        &self,
        phase: &str,
        label: &str,
        request: &impl Serialize,
        response: &impl Serialize,
    ) {
        let _ = self.write_json(&format!("{phase}.{label}.request.json"), request);
        let _ = self.write_json(&format!("{phase}.{label}.response.json"), response);
    }
}

fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => out.push('_'),
            _ => out.push(ch),
        }
    }
    out
}
