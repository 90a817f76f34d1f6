pub mod error;

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::models::CoverConfig;
use error::ConfigLoadError;

pub const CONFIG_PATH_ENV: &str = "COVERSHELF_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "COVERSHELF_CONFIG_JSON";
pub const COVER_ROOT_ENV: &str = "COVERSHELF_COVER_ROOT";

const DEFAULT_FILES: &[&str] = &[
    "covershelf.toml",
    "covershelf.json",
    "config/covershelf.toml",
    "config/covershelf.json",
];

/// Source that produced the cover configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoverConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CoverConfig,
    pub source: CoverConfigSource,
    pub env_file_loaded: bool,
    /// `COVERSHELF_COVER_ROOT` replaced the configured root.
    pub cover_root_overridden: bool,
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves [`CoverConfig`] from files and environment.
///
/// Evaluation order (first hit wins):
/// 1) `$COVERSHELF_CONFIG_PATH` (TOML or JSON file),
/// 2) `$COVERSHELF_CONFIG_JSON` (inline JSON),
/// 3) the first of `covershelf.{toml,json}` / `config/covershelf.{toml,json}`
///    found in the search directory,
/// 4) defaults.
///
/// `$COVERSHELF_COVER_ROOT` is applied on top of whichever source won.
pub struct CoverConfigLoader {
    env: EnvLookup,
    search_dir: PathBuf,
    load_dotenv: bool,
}

impl fmt::Debug for CoverConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverConfigLoader")
            .field("search_dir", &self.search_dir)
            .field("load_dotenv", &self.load_dotenv)
            .finish()
    }
}

impl Default for CoverConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverConfigLoader {
    pub fn new() -> Self {
        Self {
            env: Box::new(|key| std::env::var(key).ok()),
            search_dir: PathBuf::from("."),
            load_dotenv: true,
        }
    }

    /// Replace process environment lookups, e.g. with a fixed map in tests.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = dir.into();
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.load_dotenv = false;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_dotenv && dotenvy::dotenv().is_ok();

        let (mut config, source) = self.resolve()?;

        let mut cover_root_overridden = false;
        if let Some(root) = self.var(COVER_ROOT_ENV) {
            debug!(root = %root, "cover root overridden from environment");
            config.cover_root = PathBuf::from(root);
            cover_root_overridden = true;
        }

        config.validate()?;

        Ok(ConfigLoad {
            config,
            source,
            env_file_loaded,
            cover_root_overridden,
        })
    }

    fn resolve(
        &self,
    ) -> Result<(CoverConfig, CoverConfigSource), ConfigLoadError> {
        if let Some(path) = self.var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            let config = Self::load_from_file(&path)?;
            return Ok((config, CoverConfigSource::EnvPath(path)));
        }

        if let Some(raw) = self.var(CONFIG_JSON_ENV) {
            let config = Self::parse_json(&raw, CONFIG_JSON_ENV)?;
            return Ok((config, CoverConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, CoverConfigSource::File(path)));
        }

        Ok((CoverConfig::default(), CoverConfigSource::Default))
    }

    /// Non-empty value of `key`.
    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|value| !value.trim().is_empty())
    }

    pub fn load_from_file(path: &Path) -> Result<CoverConfig, ConfigLoadError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let origin = path.display().to_string();

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents, &origin),
            Some("toml") | Some("tml") => toml::from_str(&contents)
                .map_err(|source| ConfigLoadError::Toml { origin, source }),
            _ => Self::parse_from_str(&contents, &origin),
        }
    }

    /// Try TOML first, then JSON.
    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> Result<CoverConfig, ConfigLoadError> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                ConfigLoadError::Unrecognized {
                    origin: origin.to_string(),
                    toml: toml_err.to_string(),
                    json: json_err.to_string(),
                }
            })
        })
    }

    fn parse_json(
        raw: &str,
        origin: &str,
    ) -> Result<CoverConfig, ConfigLoadError> {
        serde_json::from_str(raw).map_err(|source| ConfigLoadError::Json {
            origin: origin.to_string(),
            source,
        })
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        DEFAULT_FILES
            .iter()
            .map(|candidate| self.search_dir.join(candidate))
            .find(|path| path.is_file())
    }
}
