use crate::client::http::OPEN_API_BASE_URL;
use crate::error::{Result, ShopError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const CONFIG_DIR_ENV: &str = "SHOPCTL_CONFIG_DIR";
const DEFAULT_OUTPUT: &str = "text";

/// Keys accepted by `shopctl config`, in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "api-base-url",
    "access-token",
    "admin-base-url",
    "admin-token",
    "admin-merchant-id",
    "output",
];

/// Configuration for shopctl, stored in `<config dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopConfig {
    /// Open API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Admin API base URL, only needed for the refund fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_merchant_id: Option<String>,

    /// Default output format, `text` or `json`
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_api_base_url() -> String {
    OPEN_API_BASE_URL.to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            admin_base_url: None,
            admin_token: None,
            admin_merchant_id: None,
            output: default_output(),
        }
    }
}

/// Directory holding `config.json`: `$SHOPCTL_CONFIG_DIR` when set, otherwise
/// the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("io", "shopline", "shopctl")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ShopError::Config("could not determine config directory".to_string()))
}

impl ShopConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        serde_json::from_str(&content).map_err(|e| {
            ShopError::Config(format!("invalid {}: {}", config_path.display(), e))
        })
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Applies `SHOPLINE_*` environment overrides on top of the file values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("SHOPLINE_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(token) = lookup("SHOPLINE_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Some(url) = lookup("SHOPLINE_ADMIN_BASE_URL") {
            self.admin_base_url = Some(url);
        }
        if let Some(token) = lookup("SHOPLINE_ADMIN_TOKEN") {
            self.admin_token = Some(token);
        }
        if let Some(id) = lookup("SHOPLINE_ADMIN_MERCHANT_ID") {
            self.admin_merchant_id = Some(id);
        }
    }

    /// The Open API token, required before any request is made.
    pub fn access_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ShopError::Config(
                    "access token required: set SHOPLINE_ACCESS_TOKEN env var or `shopctl config access-token <token>`"
                        .to_string(),
                )
            })
    }

    /// Display value for `key`, with tokens masked. `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let shown = |value: &Option<String>| value.clone().unwrap_or_else(|| "(not set)".into());
        let masked = |value: &Option<String>| match value {
            Some(v) => mask_secret(v),
            None => "(not set)".into(),
        };

        match key {
            "api-base-url" => Some(self.api_base_url.clone()),
            "access-token" => Some(masked(&self.access_token)),
            "admin-base-url" => Some(shown(&self.admin_base_url)),
            "admin-token" => Some(masked(&self.admin_token)),
            "admin-merchant-id" => Some(shown(&self.admin_merchant_id)),
            "output" => Some(self.output.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        let optional = || {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        match key {
            "api-base-url" => {
                if value.is_empty() {
                    return Err("api-base-url cannot be empty".to_string());
                }
                self.api_base_url = value.to_string();
            }
            "access-token" => self.access_token = optional(),
            "admin-base-url" => self.admin_base_url = optional(),
            "admin-token" => self.admin_token = optional(),
            "admin-merchant-id" => self.admin_merchant_id = optional(),
            "output" => match value {
                "text" | "json" => self.output = value.to_string(),
                other => {
                    return Err(format!(
                        "Invalid output format: {} (expected text or json)",
                        other
                    ))
                }
            },
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
