//! gradewise configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::model::PeerScope;
use crate::vector::IdfWeighting;

/// Top-level gradewise configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradewiseConfig {
    /// IDF variant for term vectors.
    #[serde(default)]
    pub idf: IdfWeighting,
    /// Max submissions evaluated concurrently in a batch.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Which peers each submission is compared against.
    #[serde(default)]
    pub peer_scope: PeerScope,
    /// Risk percentage at or above which a submission is flagged.
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: u32,
    /// Score ceiling used when a single evaluation names none.
    #[serde(default = "default_max_score")]
    pub default_max_score: u32,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_parallelism() -> usize {
    4
}
fn default_risk_threshold() -> u32 {
    50
}
fn default_max_score() -> u32 {
    100
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./gradewise-results")
}

impl Default for GradewiseConfig {
    fn default() -> Self {
        Self {
            idf: IdfWeighting::default(),
            parallelism: default_parallelism(),
            peer_scope: PeerScope::default(),
            risk_threshold: default_risk_threshold(),
            default_max_score: default_max_score(),
            output_dir: default_output_dir(),
        }
    }
}

impl GradewiseConfig {
    pub fn engine(&self) -> EngineConfig {
        EngineConfig { idf: self.idf }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never rescanned. An unclosed
/// `${` is kept as literal text.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let value = std::env::var(&after[..end]).unwrap_or_default();
                result.push_str(&value);
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `gradewise.toml` in the current directory
/// 2. `~/.config/gradewise/config.toml`
///
/// Environment variable overrides: `GRADEWISE_OUTPUT_DIR`, `GRADEWISE_RISK_THRESHOLD`.
pub fn load_config_from(path: Option<&Path>) -> Result<GradewiseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradewise.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<GradewiseConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => GradewiseConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("GRADEWISE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Ok(threshold) = std::env::var("GRADEWISE_RISK_THRESHOLD") {
        config.risk_threshold = threshold.trim().parse().with_context(|| {
            format!("GRADEWISE_RISK_THRESHOLD must be a whole percentage, got '{threshold}'")
        })?;
    }

    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));

    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(
        config.risk_threshold <= 100,
        "risk_threshold must be between 0 and 100"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradewise"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_GRADEWISE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_GRADEWISE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_GRADEWISE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars here"), "no vars here");
        std::env::remove_var("_GRADEWISE_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_GRADEWISE_SELF_REF", "${_GRADEWISE_SELF_REF}");
        assert_eq!(
            resolve_env_vars("out/${_GRADEWISE_SELF_REF}/x"),
            "out/${_GRADEWISE_SELF_REF}/x"
        );
        std::env::remove_var("_GRADEWISE_SELF_REF");

        std::env::set_var("_GRADEWISE_NESTED", "${HOME}");
        assert_eq!(resolve_env_vars("${_GRADEWISE_NESTED}"), "${HOME}");
        std::env::remove_var("_GRADEWISE_NESTED");
    }

    #[test]
    fn resolve_env_vars_edge_cases() {
        assert_eq!(resolve_env_vars("unclosed ${VAR"), "unclosed ${VAR");
        assert_eq!(resolve_env_vars("${_GRADEWISE_UNSET_VAR}/out"), "/out");
        assert_eq!(resolve_env_vars("$HOME stays"), "$HOME stays");
    }

    #[test]
    fn default_config() {
        let config = GradewiseConfig::default();
        assert_eq!(config.idf, IdfWeighting::Smoothed);
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.peer_scope, PeerScope::Prior);
        assert_eq!(config.risk_threshold, 50);
        assert_eq!(config.default_max_score, 100);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
idf = "raw"
peer_scope = "all"
risk_threshold = 70
"#;
        let config: GradewiseConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.idf, IdfWeighting::Raw);
        assert_eq!(config.peer_scope, PeerScope::All);
        assert_eq!(config.risk_threshold, 70);
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.engine().idf, IdfWeighting::Raw);
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradewise.toml");
        std::fs::write(&path, "parallelism = 2\ndefault_max_score = 20\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.parallelism, 2);
        assert_eq!(config.default_max_score, 20);
    }

    #[test]
    fn self_referential_output_dir_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradewise.toml");
        std::fs::write(&path, "output_dir = \"out/${_GRADEWISE_LOOP_DIR}\"\n").unwrap();
        std::env::set_var("_GRADEWISE_LOOP_DIR", "${_GRADEWISE_LOOP_DIR}");

        let config = load_config_from(Some(&path)).unwrap();
        std::env::remove_var("_GRADEWISE_LOOP_DIR");
        assert_eq!(config.output_dir, PathBuf::from("out/${_GRADEWISE_LOOP_DIR}"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/gradewise.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn rejects_zero_parallelism() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradewise.toml");
        std::fs::write(&path, "parallelism = 0\n").unwrap();
        assert!(load_config_from(Some(&path)).is_err());
    }
}
