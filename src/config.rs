use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_PATH_VAR: &str = "CASEDROPS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "casedrops.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the catalog and history files.
    pub data_dir: PathBuf,
    pub cases_file: String,
    pub history_file: String,
    /// Openings up to this count are listed item by item.
    pub max_display_count: usize,
    /// Upper bound on openings per request.
    pub max_open_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data").join("openweaponscase"),
            cases_file: "cases.json".to_string(),
            history_file: "open_history.json".to_string(),
            max_display_count: 10,
            max_open_count: 100,
        }
    }
}

impl Settings {
    /// Load from `$CASEDROPS_CONFIG` (default `casedrops.toml`), then apply
    /// environment overrides. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut settings = Self::from_file(Path::new(&path))?;
        settings.apply_env(|name| env::var(name).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Environment overrides, looked up through `var` so tests need not
    /// touch the process environment.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("CASEDROPS_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("CASEDROPS_MAX_DISPLAY") {
            self.max_display_count = parse_var("CASEDROPS_MAX_DISPLAY", v)?;
        }
        if let Some(v) = var("CASEDROPS_MAX_OPEN") {
            self.max_open_count = parse_var("CASEDROPS_MAX_OPEN", v)?;
        }
        Ok(())
    }

    pub fn cases_path(&self) -> PathBuf {
        self.data_dir.join(&self.cases_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { name, value })
}
