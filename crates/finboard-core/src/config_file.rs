use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub source: Option<SourceConfig>,
    pub rules: Option<RulesConfig>,
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub report_path: Option<String>,
    pub max_pages: Option<usize>,
}

/// Regex overrides for the extraction rules. Each pattern needs exactly one
/// capture group holding the figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub revenue_pattern: Option<String>,
    pub income_pattern: Option<String>,
    pub azure_pattern: Option<String>,
}

/// Fallback figures ($B) used when a rule does not match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub revenue: Option<f64>,
    pub income: Option<f64>,
    pub azure: Option<f64>,
}

/// Platform config directory path: `<config_dir>/finboard/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("finboard").join("config.toml"))
}

/// Load config by cascading CWD `.finboard.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".finboard.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }
    match load_explicit(path) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config");
            None
        }
    }
}

/// Load a config the user pointed at directly; unlike [`load_from_path`],
/// a missing or malformed file is an error.
pub fn load_explicit(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        source: Some(SourceConfig {
            report_path: overlay
                .source
                .as_ref()
                .and_then(|s| s.report_path.clone())
                .or_else(|| base.source.as_ref().and_then(|s| s.report_path.clone())),
            max_pages: overlay
                .source
                .as_ref()
                .and_then(|s| s.max_pages)
                .or_else(|| base.source.as_ref().and_then(|s| s.max_pages)),
        }),
        rules: Some(RulesConfig {
            revenue_pattern: overlay
                .rules
                .as_ref()
                .and_then(|r| r.revenue_pattern.clone())
                .or_else(|| base.rules.as_ref().and_then(|r| r.revenue_pattern.clone())),
            income_pattern: overlay
                .rules
                .as_ref()
                .and_then(|r| r.income_pattern.clone())
                .or_else(|| base.rules.as_ref().and_then(|r| r.income_pattern.clone())),
            azure_pattern: overlay
                .rules
                .as_ref()
                .and_then(|r| r.azure_pattern.clone())
                .or_else(|| base.rules.as_ref().and_then(|r| r.azure_pattern.clone())),
        }),
        defaults: Some(DefaultsConfig {
            revenue: overlay
                .defaults
                .as_ref()
                .and_then(|d| d.revenue)
                .or_else(|| base.defaults.as_ref().and_then(|d| d.revenue)),
            income: overlay
                .defaults
                .as_ref()
                .and_then(|d| d.income)
                .or_else(|| base.defaults.as_ref().and_then(|d| d.income)),
            azure: overlay
                .defaults
                .as_ref()
                .and_then(|d| d.azure)
                .or_else(|| base.defaults.as_ref().and_then(|d| d.azure)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_parses() {
        let toml_str = "[source]\nmax_pages = 3\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let source = parsed.source.unwrap();
        assert_eq!(source.max_pages, Some(3));
        assert!(source.report_path.is_none());
        assert!(parsed.rules.is_none());
    }

    #[test]
    fn defaults_round_trip_toml() {
        let config = ConfigFile {
            defaults: Some(DefaultsConfig {
                revenue: Some(245.1),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.defaults.unwrap().revenue, Some(245.1));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            source: Some(SourceConfig {
                report_path: Some("/base/report.pdf".to_string()),
                max_pages: Some(2),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            source: Some(SourceConfig {
                report_path: Some("/overlay/report.pdf".to_string()),
                max_pages: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let source = merged.source.unwrap();
        assert_eq!(source.report_path.as_deref(), Some("/overlay/report.pdf"));
        assert_eq!(source.max_pages, Some(2));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            rules: Some(RulesConfig {
                azure_pattern: Some(r"Azure\s+hit\s+\$([\d.]+)".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(
            merged.rules.unwrap().azure_pattern.as_deref(),
            Some(r"Azure\s+hit\s+\$([\d.]+)")
        );
    }

    #[test]
    fn explicit_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_explicit(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn explicit_load_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[source\nmax_pages = ").unwrap();
        assert!(matches!(
            load_explicit(&path).unwrap_err(),
            ConfigError::Parse { .. }
        ));
        assert!(load_from_path(&path).is_none());
    }
}
