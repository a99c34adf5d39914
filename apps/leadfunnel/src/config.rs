//! # Configuration
//!
//! Settings come from an optional TOML file, then environment variables
//! override individual keys. Missing credentials never stop the server:
//! they change what a submission does (see the orchestrator).
//!
//! ## Environment Variables
//!
//! - `GOOGLE_API_KEY`: language-model credential
//! - `LEADFUNNEL_MODEL`, `LEADFUNNEL_MODEL_ENDPOINT`, `LEADFUNNEL_MODEL_TIMEOUT_SECS`
//! - `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID`, `EMAILJS_PUBLIC_KEY`, `EMAILJS_PRIVATE_KEY`
//! - `LEADFUNNEL_EMAIL_ENDPOINT`
//! - `LEADFUNNEL_CORS_ORIGINS`: comma-separated origins, or "*" (default: localhost only)
//! - `LEADFUNNEL_RATE_LIMIT`: requests per second (default: 20, 0 to disable)
//!
//! Empty values count as unset.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_MODEL_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_EMAIL_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const DEFAULT_RATE_LIMIT: u32 = 20;

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid config file: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

// =============================================================================
// SECTIONS
// =============================================================================

/// HTTP listener and middleware settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Option<String>,
    pub rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }
}

/// Language-model settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }
}

impl ModelConfig {
    /// The credential, if configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &redact(self.api_key()))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// E-mail provider settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    pub endpoint: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: None,
            template_id: None,
            public_key: None,
            private_key: None,
            endpoint: DEFAULT_EMAIL_ENDPOINT.to_string(),
        }
    }
}

/// The four keys needed to send through the e-mail API.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub private_key: String,
}

impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &"<redacted>")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl EmailConfig {
    /// All four credentials, or `None` if any is missing.
    pub fn credentials(&self) -> Option<EmailCredentials> {
        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
        Some(EmailCredentials {
            service_id: present(&self.service_id)?,
            template_id: present(&self.template_id)?,
            public_key: present(&self.public_key)?,
            private_key: present(&self.private_key)?,
        })
    }

    /// Presence of each credential, for diagnostics.
    pub fn presence(&self) -> [(&'static str, bool); 4] {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        [
            ("EMAILJS_SERVICE_ID", set(&self.service_id)),
            ("EMAILJS_TEMPLATE_ID", set(&self.template_id)),
            ("EMAILJS_PUBLIC_KEY", set(&self.public_key)),
            ("EMAILJS_PRIVATE_KEY", set(&self.private_key)),
        ]
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &redact(self.public_key.as_deref()))
            .field("private_key", &redact(self.private_key.as_deref()))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "<redacted>",
        _ => "<unset>",
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load from an optional TOML file, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.model.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "model.timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment, in production).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("GOOGLE_API_KEY") {
            self.model.api_key = Some(v);
        }
        if let Some(v) = get("LEADFUNNEL_MODEL") {
            self.model.model = v;
        }
        if let Some(v) = get("LEADFUNNEL_MODEL_ENDPOINT") {
            self.model.endpoint = v;
        }
        if let Some(v) = get("LEADFUNNEL_MODEL_TIMEOUT_SECS") {
            self.model.timeout_secs = v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "LEADFUNNEL_MODEL_TIMEOUT_SECS",
                    value: v.clone(),
                })?;
        }

        if let Some(v) = get("EMAILJS_SERVICE_ID") {
            self.email.service_id = Some(v);
        }
        if let Some(v) = get("EMAILJS_TEMPLATE_ID") {
            self.email.template_id = Some(v);
        }
        if let Some(v) = get("EMAILJS_PUBLIC_KEY") {
            self.email.public_key = Some(v);
        }
        if let Some(v) = get("EMAILJS_PRIVATE_KEY") {
            self.email.private_key = Some(v);
        }
        if let Some(v) = get("LEADFUNNEL_EMAIL_ENDPOINT") {
            self.email.endpoint = v;
        }

        if let Some(v) = get("LEADFUNNEL_CORS_ORIGINS") {
            self.server.cors_origins = Some(v);
        }
        if let Some(v) = get("LEADFUNNEL_RATE_LIMIT") {
            self.server.rate_limit = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "LEADFUNNEL_RATE_LIMIT",
                value: v.clone(),
            })?;
        }

        Ok(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
