use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parsing: Option<ParsingSection>,
    pub fetch: Option<FetchSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingSection {
    /// Section headers appended to the built-in registry.
    pub extra_section_headers: Option<Vec<String>>,
    /// Skill names appended to the built-in vocabulary.
    pub extra_skills: Option<Vec<String>>,
    pub min_block_chars: Option<usize>,
    pub name_scan_lines: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchSection {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

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

/// Platform config directory path: `<config_dir>/cvsift/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cvsift").join("config.toml"))
}

/// Load config by cascading CWD `.cvsift.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".cvsift.toml"));

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
    match read_config(path) {
        Ok(config) => Some(config),
        Err(ConfigError::Read { .. }) => None,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Load a config the user asked for explicitly; any failure is an error.
pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
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
    let base_parsing = base.parsing.unwrap_or_default();
    let over_parsing = overlay.parsing.unwrap_or_default();
    let base_fetch = base.fetch.unwrap_or_default();
    let over_fetch = overlay.fetch.unwrap_or_default();

    ConfigFile {
        parsing: Some(ParsingSection {
            extra_section_headers: over_parsing
                .extra_section_headers
                .or(base_parsing.extra_section_headers),
            extra_skills: over_parsing.extra_skills.or(base_parsing.extra_skills),
            min_block_chars: over_parsing.min_block_chars.or(base_parsing.min_block_chars),
            name_scan_lines: over_parsing.name_scan_lines.or(base_parsing.name_scan_lines),
        }),
        fetch: Some(FetchSection {
            timeout_secs: over_fetch.timeout_secs.or(base_fetch.timeout_secs),
            user_agent: over_fetch.user_agent.or(base_fetch.user_agent),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_section_round_trip_toml() {
        let config = ConfigFile {
            parsing: Some(ParsingSection {
                extra_skills: Some(vec!["Rust".to_string(), "Terraform".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.parsing.unwrap().extra_skills.unwrap(),
            vec!["Rust".to_string(), "Terraform".to_string()]
        );
    }

    #[test]
    fn absent_fields_deserialize_as_none() {
        let toml_str = "[fetch]\ntimeout_secs = 5\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(parsed.parsing.is_none());
        let fetch = parsed.fetch.unwrap();
        assert_eq!(fetch.timeout_secs, Some(5));
        assert!(fetch.user_agent.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            fetch: Some(FetchSection {
                timeout_secs: Some(30),
                user_agent: Some("base-agent".to_string()),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            fetch: Some(FetchSection {
                timeout_secs: Some(5),
                user_agent: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay).fetch.unwrap();
        assert_eq!(merged.timeout_secs, Some(5));
        assert_eq!(merged.user_agent.as_deref(), Some("base-agent"));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            parsing: Some(ParsingSection {
                min_block_chars: Some(40),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.parsing.unwrap().min_block_chars, Some(40));
    }

    #[test]
    fn read_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[parsing\nmin_block_chars = ").unwrap();
        assert!(matches!(read_config(&path), Err(ConfigError::Parse { .. })));
        assert!(load_from_path(&path).is_none());
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());
    }
}
