//! Client config load/save for `~/.rag-chat/config.yaml`.

use std::path::{Path, PathBuf};

/// Header carrying the credential when none is configured.
pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";

/// Prompts offered on an empty conversation.
pub const DEFAULT_SUGGESTED_PROMPTS: [&str; 4] = [
    "Ingenieures Berufe in der Nähe Gummersbach",
    "Karrierechancen in Oberberg",
    "Tipps für das Finden meines Praktikums",
    "Wie trete ich mit den Unternehmen in Kontakt?",
];

/// Endpoint section (url, api_key, api_key_header).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EndpointSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_header: Option<String>,
}

/// UI section (suggested_prompts).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_prompts: Option<Vec<String>>,
}

/// Full config file.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointSection,
    #[serde(default)]
    pub ui: UiSection,
}

/// Resolved endpoint the answer client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub api_key: String,
    pub api_key_header: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: String::new(),
            api_key_header: DEFAULT_API_KEY_HEADER.into(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// The credential to send, or `None` when it is blank after trimming.
    pub fn credential(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

impl Config {
    /// Resolve the endpoint section, filling in defaults.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        let url = self
            .endpoint
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUrl)?;
        Ok(Endpoint {
            url: url.to_string(),
            api_key: self.endpoint.api_key.clone().unwrap_or_default(),
            api_key_header: self
                .endpoint
                .api_key_header
                .clone()
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.into()),
        })
    }

    pub fn suggested_prompts(&self) -> Vec<String> {
        match &self.ui.suggested_prompts {
            Some(prompts) => prompts.clone(),
            None => DEFAULT_SUGGESTED_PROMPTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Returns the default config file path: `~/.rag-chat/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".rag-chat").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("endpoint.url is not set")]
    MissingUrl,
}
