use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::points::DEFAULT_UNKNOWN_POINTS;

/// Configuration for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether to seed sample requests when the request collection is empty.
    pub seed_sample_data: bool,

    /// Points shown per completed request in the summary counters.
    ///
    /// This is a display figure only. The points actually credited to users
    /// are drawn per waste type when a request is completed.
    display_points_per_completion: u64,

    /// Points awarded for a waste type that has no entry in the point table.
    unknown_waste_points: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            display_points_per_completion: default_display_points(),
            unknown_waste_points: default_unknown_points(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads `config.toml` from `root`, using the defaults if there is no such
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed. An
    /// invalid file never silently re-enables sample seeding.
    pub fn load_or_default(root: &Path) -> Result<Self, String> {
        let path = root.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Points shown per completed request in the summary counters.
    #[must_use]
    pub const fn display_points_per_completion(&self) -> u64 {
        self.display_points_per_completion
    }

    /// Points awarded for an unrecognised waste type.
    #[must_use]
    pub const fn unknown_waste_points(&self) -> u64 {
        self.unknown_waste_points
    }
}

const fn default_true() -> bool {
    true
}

const fn default_display_points() -> u64 {
    500
}

const fn default_unknown_points() -> u64 {
    DEFAULT_UNKNOWN_POINTS
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_true")]
        seed_sample_data: bool,

        #[serde(default = "default_display_points")]
        display_points_per_completion: u64,

        #[serde(default = "default_unknown_points")]
        unknown_waste_points: u64,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                seed_sample_data,
                display_points_per_completion,
                unknown_waste_points,
            } => Self {
                seed_sample_data,
                display_points_per_completion,
                unknown_waste_points,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            seed_sample_data: config.seed_sample_data,
            display_points_per_completion: config.display_points_per_completion,
            unknown_waste_points: config.unknown_waste_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\n\
              seed_sample_data = false\n\
              display_points_per_completion = 250\n\
              unknown_waste_points = 50\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert!(!config.seed_sample_data);
        assert_eq!(config.display_points_per_completion(), 250);
        assert_eq!(config.unknown_waste_points(), 50);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nunknown_waste_points = \"lots\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn load_or_default_falls_back_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_or_default(tmp.path()).unwrap(), Config::default());
    }

    #[test]
    fn load_or_default_rejects_an_invalid_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "_version = \"1\"\nseed_sample_data = flase\n",
        )
        .unwrap();

        let error = Config::load_or_default(tmp.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            seed_sample_data: false,
            ..Config::default()
        };

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }
}
