//! TOML configuration file.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults of the corresponding config struct.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{AnalysisConfig, PlaybackConfig};
use crate::error::ConfigError;

/// File name looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "octave-scope.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub analysis: AnalysisConfig,
    pub playback: PlaybackConfig,
}

impl ConfigFile {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }
}

/// Resolve which config file to read: the explicit path, else
/// [`DEFAULT_CONFIG_FILE`] if it exists in the working directory.
pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::WindowKind;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ConfigFile::parse(Path::new("empty.toml"), "").unwrap();
        assert_eq!(config.analysis.window_size, 512);
        assert_eq!(config.analysis.octave_count, 8);
        assert!(config.playback.input.is_none());
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let content = r#"
            [analysis]
            window_size = 1024
            window = "rectangular"

            [playback]
            input = "song.wav"
            looping = true
        "#;
        let config = ConfigFile::parse(Path::new("partial.toml"), content).unwrap();

        assert_eq!(config.analysis.window_size, 1024);
        assert_eq!(config.analysis.window, WindowKind::Rectangular);
        assert_eq!(config.analysis.octave_count, 8);
        assert_eq!(config.playback.input, Some(PathBuf::from("song.wav")));
        assert!(config.playback.looping);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let err = ConfigFile::parse(Path::new("broken.toml"), "[analysis\n").unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ConfigFile::load(Path::new("/nonexistent/octave-scope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("custom.toml");
        assert_eq!(locate_config(Some(path)), Some(PathBuf::from("custom.toml")));
    }
}
