//! Configuration management for git-version.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::output::Format;

/// Name of the project-local configuration file.
pub const PROJECT_CONFIG_FILE: &str = ".git-version.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Probe configuration.
    pub probe: ProbeConfig,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when none is given on the command line.
    pub format: Format,

    /// Appended to the short commit id of dirty builds in version strings.
    pub dirty_marker: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::Text,
            dirty_marker: "*".to_string(),
        }
    }
}

/// Probe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Git program used by `probe` and `verify`.
    pub git: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default paths.
    ///
    /// Loads global config first, then merges project-local config if present.
    pub fn load() -> Result<Self> {
        let global = Self::config_path()?;
        let project = Self::project_config_path()?;
        Self::load_from(&global, Some(&project))
    }

    /// Load `global` and merge `project` over it. Missing files are skipped.
    pub fn load_from(global: &Path, project: Option<&Path>) -> Result<Self> {
        let mut config = Self::read(global)?.unwrap_or_default();

        if let Some(project_config) = project.map(Self::read).transpose()?.flatten() {
            config.merge(project_config);
        }

        Ok(config)
    }

    /// Parse the file at `path`, `None` if it does not exist.
    fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Merge another config into this one (project overrides global).
    fn merge(&mut self, other: Self) {
        let defaults = Self::default();

        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.dirty_marker != defaults.output.dirty_marker {
            self.output.dirty_marker = other.output.dirty_marker;
        }
        if other.probe.git != defaults.probe.git {
            self.probe.git = other.probe.git;
        }
    }

    /// Get the project-local configuration file path.
    ///
    /// Looks for `.git-version.toml` in the current directory.
    pub fn project_config_path() -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(cwd.join(PROJECT_CONFIG_FILE))
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the config directory path (`~/.config/git-version/`).
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config_home).join("git-version"));
        }

        if cfg!(target_os = "macos") {
            if let Ok(home) = std::env::var("HOME") {
                return Ok(PathBuf::from(home).join(".config").join("git-version"));
            }
        }

        let base = directories::BaseDirs::new().ok_or(Error::NoConfigDir)?;

        Ok(base.config_dir().join("git-version"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_text_with_star_marker() {
        let config = Config::default();
        assert_eq!(config.output.format, Format::Text);
        assert_eq!(config.output.dirty_marker, "*");
        assert_eq!(config.probe.git, "git");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[output]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.output.format, Format::Json);
        assert_eq!(config.output.dirty_marker, "*");
        assert_eq!(config.probe, ProbeConfig::default());
    }

    #[test]
    fn missing_files_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(
            &dir.path().join("config.toml"),
            Some(&dir.path().join(PROJECT_CONFIG_FILE)),
        )
        .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn project_overrides_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("config.toml");
        let project = dir.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(
            &global,
            "[output]\nformat = \"env\"\ndirty_marker = \"+\"\n\n[probe]\ngit = \"/usr/bin/git\"\n",
        )
        .unwrap();
        std::fs::write(&project, "[output]\nformat = \"json\"\n").unwrap();

        let config = Config::load_from(&global, Some(&project)).unwrap();
        assert_eq!(config.output.format, Format::Json);
        assert_eq!(config.output.dirty_marker, "+");
        assert_eq!(config.probe.git, "/usr/bin/git");
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("config.toml");
        std::fs::write(&global, "[output]\nformat = \"yaml\"\n").unwrap();

        let err = Config::load_from(&global, None).unwrap_err();
        assert!(matches!(err, Error::ParseConfig { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("format = \"text\""));
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }
}
