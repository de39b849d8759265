use crate::core::TableLayout;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::Validate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "data/sample_program.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub progress_bar_width: usize,
    pub title_width: usize,
    pub code_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let layout = TableLayout::default();
        Self {
            progress_bar_width: 30,
            title_width: layout.title_width,
            code_width: layout.code_width,
        }
    }
}

impl DashboardConfig {
    /// Reads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` if it exists, otherwise falls back to the defaults.
    pub fn from_optional_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!("Reading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// The command-line path wins over the configured one.
    pub fn resolve_data_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.data.path.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
    }

    pub fn table_layout(&self) -> TableLayout {
        TableLayout {
            title_width: self.display.title_width,
            code_width: self.display.code_width,
        }
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.data.path {
            if path.trim().is_empty() {
                return Err(DashboardError::validation("data.path must not be empty"));
            }
        }
        let widths = [
            ("display.progress_bar_width", self.display.progress_bar_width),
            ("display.title_width", self.display.title_width),
            ("display.code_width", self.display.code_width),
        ];
        for (field, width) in widths {
            if width == 0 {
                return Err(DashboardError::validation(format!("{} must be at least 1", field)));
            }
        }
        Ok(())
    }
}
