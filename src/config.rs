use std::fs;
use std::path::Path;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::data::model::{Station, TemperatureKey};
use crate::data::normalize::normalize;
use crate::data::powerset::{DEFAULT_CEILING, HARD_LIMIT};
use crate::error::ConfigError;

/// Subsets shown by the text report before the remainder is summarised.
pub const DEFAULT_DISPLAY_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Header detection
// ---------------------------------------------------------------------------

/// How the first row of the input is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Skip row 0 iff its first field is exactly `date`.
    #[default]
    Auto,
    /// Always skip row 0.
    Always,
    /// Row 0 is always data.
    Never,
}

impl HeaderPolicy {
    pub fn is_header(self, first_field: &str) -> bool {
        match self {
            HeaderPolicy::Auto => first_field.trim() == "date",
            HeaderPolicy::Always => true,
            HeaderPolicy::Never => false,
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Tunables for one analysis run.
///
/// Loaded from JSON (all fields optional), then overridden from the command
/// line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Universe members are strictly above this. Accepts `33` or `"33,0"`.
    #[serde(deserialize_with = "deserialize_threshold")]
    pub threshold: TemperatureKey,
    /// Largest intersection enumerated in full by the power-set generator.
    pub power_set_ceiling: usize,
    /// Subsets printed by the text report.
    pub display_limit: usize,
    pub header: HeaderPolicy,
    pub north_label: String,
    pub northeast_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: TemperatureKey::from_canonical("33.00".to_string()),
            power_set_ceiling: DEFAULT_CEILING,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            header: HeaderPolicy::Auto,
            north_label: "North".to_string(),
            northeast_label: "Northeast".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AnalysisConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.power_set_ceiling > HARD_LIMIT {
            return Err(ConfigError::Invalid {
                field: "power_set_ceiling",
                message: format!(
                    "{} exceeds the hard limit of {HARD_LIMIT}",
                    self.power_set_ceiling
                ),
            });
        }
        for (field, label) in [
            ("north_label", &self.north_label),
            ("northeast_label", &self.northeast_label),
        ] {
            if label.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    message: "must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Display name for a station.
    pub fn label(&self, station: Station) -> &str {
        match station {
            Station::North => &self.north_label,
            Station::Northeast => &self.northeast_label,
        }
    }
}

fn deserialize_threshold<'de, D>(deserializer: D) -> Result<TemperatureKey, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    };
    normalize(&text).map_err(de::Error::custom)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
