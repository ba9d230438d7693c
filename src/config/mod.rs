//! Configuration system (layered: code > env > config file > defaults).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AlfredError;

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_BIND: &str = "127.0.0.1:8000";
const DEFAULT_MAX_ITERATIONS: usize = 20;
const DEFAULT_UPLOAD_MAX_AGE: Duration = Duration::from_secs(3600);

/// Runtime configuration for the agent, server and CLI.
#[derive(Clone, PartialEq)]
pub struct AlfredConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Planner model id.
    pub model: String,
    /// Model used by `extract_text`.
    pub vision_model: String,
    pub bind: String,
    pub upload_dir: PathBuf,
    pub index_html: PathBuf,
    /// `None` disables the log file; stderr logging is always on.
    pub log_file: Option<PathBuf>,
    pub max_iterations: usize,
    pub upload_max_age: Duration,
}

impl fmt::Debug for AlfredConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlfredConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("vision_model", &self.vision_model)
            .field("bind", &self.bind)
            .field("upload_dir", &self.upload_dir)
            .field("index_html", &self.index_html)
            .field("log_file", &self.log_file)
            .field("max_iterations", &self.max_iterations)
            .field("upload_max_age", &self.upload_max_age)
            .finish()
    }
}

impl Default for AlfredConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_MODEL.to_string(),
            bind: DEFAULT_BIND.to_string(),
            upload_dir: PathBuf::from("uploads"),
            index_html: PathBuf::from("index.html"),
            log_file: Some(PathBuf::from("agent.log")),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            upload_max_age: DEFAULT_UPLOAD_MAX_AGE,
        }
    }
}

/// On-disk TOML settings. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    vision_model: Option<String>,
    bind: Option<String>,
    upload_dir: Option<PathBuf>,
    index_html: Option<PathBuf>,
    log_file: Option<String>,
    max_iterations: Option<usize>,
    upload_max_age_secs: Option<u64>,
}

impl AlfredConfig {
    /// Load `path` as TOML on top of the defaults, then apply the environment
    /// (including `.env` if present).
    pub fn load(path: Option<&Path>) -> Result<Self, AlfredError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let base = match path {
            Some(path) => Self::default().with_file(path)?,
            None => Self::default(),
        };
        base.with_lookup(|key| std::env::var(key).ok())
    }

    /// Overlay settings from a TOML file.
    pub fn with_file(self, path: &Path) -> Result<Self, AlfredError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AlfredError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        self.with_toml(&raw)
            .map_err(|e| AlfredError::Configuration(format!("{}: {e}", path.display())))
    }

    fn with_toml(mut self, raw: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(raw)?;
        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if file.base_url.is_some() {
            self.base_url = file.base_url;
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(model) = file.vision_model {
            self.vision_model = model;
        }
        if let Some(bind) = file.bind {
            self.bind = bind;
        }
        if let Some(dir) = file.upload_dir {
            self.upload_dir = dir;
        }
        if let Some(page) = file.index_html {
            self.index_html = page;
        }
        if let Some(log_file) = file.log_file {
            self.log_file = parse_log_file(&log_file);
        }
        if let Some(n) = file.max_iterations {
            self.max_iterations = n;
        }
        if let Some(secs) = file.upload_max_age_secs {
            self.upload_max_age = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Overlay settings from an environment-style lookup.
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self, AlfredError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(model) = non_empty("ALFRED_MODEL") {
            self.model = model;
        }
        if let Some(model) = non_empty("ALFRED_VISION_MODEL") {
            self.vision_model = model;
        }
        if let Some(bind) = non_empty("ALFRED_BIND") {
            self.bind = bind;
        }
        if let Some(dir) = non_empty("ALFRED_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(page) = non_empty("ALFRED_INDEX_HTML") {
            self.index_html = PathBuf::from(page);
        }
        if let Some(log_file) = lookup("ALFRED_LOG_FILE") {
            self.log_file = parse_log_file(&log_file);
        }
        if let Some(n) = non_empty("ALFRED_MAX_ITERATIONS") {
            self.max_iterations = parse_number("ALFRED_MAX_ITERATIONS", &n)?;
        }
        if let Some(secs) = non_empty("ALFRED_UPLOAD_MAX_AGE_SECS") {
            self.upload_max_age = Duration::from_secs(parse_number("ALFRED_UPLOAD_MAX_AGE_SECS", &secs)?);
        }

        if self.max_iterations == 0 {
            return Err(AlfredError::Configuration(
                "max_iterations must be at least 1".into(),
            ));
        }
        Ok(self)
    }
}

/// Empty string or `off` disables file logging.
fn parse_log_file(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("off") {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AlfredError> {
    raw.trim()
        .parse()
        .map_err(|_| AlfredError::Configuration(format!("{key} must be a non-negative integer, got '{raw}'")))
}
