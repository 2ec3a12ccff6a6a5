use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// File name looked up in the working directory before falling back to the
/// embedded defaults.
pub const LOCAL_CONFIG_FILE: &str = "historyview.yml";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrder {
    #[default]
    Natural,
    LastVisitDesc,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSelection {
    #[default]
    InstallDefault,
    FirstMatch,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub order: RecordOrder,
    #[serde(default)]
    pub firefox_profile: ProfileSelection,
    #[serde(default)]
    pub export_jsonl: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p).with_context(|| format!("reading config {}", p.display()))?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let mut config: Config = serde_yaml::from_slice(&bytes).with_context(|| match path {
        Some(p) => format!("parsing config {}", p.display()),
        None => "parsing embedded default config".to_string(),
    })?;
    if config.run_id.trim().is_empty() {
        config.run_id = generate_run_id();
    }

    Ok(LoadedConfig {
        config,
        source: path.map(Path::to_path_buf),
    })
}

/// Returns the working-directory config file when present.
pub fn local_config_path(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(LOCAL_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

/// UTC start time to the microsecond plus the process id, e.g.
/// `20241003T101502.123456Z_4242`.
fn generate_run_id() -> String {
    let started = chrono::Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
    format!("{started}_{}", std::process::id())
}
