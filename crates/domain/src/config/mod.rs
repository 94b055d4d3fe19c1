mod assistant;
mod llm;
mod session;
mod video;

pub use assistant::*;
pub use llm::*;
pub use session::*;
pub use video::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl ConfigError {
    fn error(field: &str, message: &str) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: &str) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.llm.base_url.is_empty() {
            errors.push(ConfigError::error("llm.base_url", "base_url must not be empty"));
        }
        if self.llm.chat_model.is_empty() {
            errors.push(ConfigError::error("llm.chat_model", "chat_model must not be empty"));
        }
        if self.llm.request_timeout_ms == 0 {
            errors.push(ConfigError::error(
                "llm.request_timeout_ms",
                "request timeout must be greater than 0",
            ));
        }

        let auth = &self.llm.auth;
        if auth.key.is_some() {
            errors.push(ConfigError::warning(
                "llm.auth.key",
                "plaintext API key in config (prefer 'env' or keychain)",
            ));
        }
        if auth.service.is_some() != auth.account.is_some() {
            errors.push(ConfigError::error(
                "llm.auth",
                "keychain lookup needs both 'service' and 'account'",
            ));
        }
        if auth.key.is_none() && auth.env.is_none() && auth.service.is_none() {
            errors.push(ConfigError::warning(
                "llm.auth",
                "no API key source configured; the key must be selected interactively",
            ));
        }

        if self.video.model.is_empty() {
            errors.push(ConfigError::error("video.model", "model must not be empty"));
        }
        if self.video.poll_interval_ms == 0 {
            errors.push(ConfigError::error(
                "video.poll_interval_ms",
                "poll interval must be greater than 0",
            ));
        }
        if self.video.number_of_videos == 0 {
            errors.push(ConfigError::error(
                "video.number_of_videos",
                "at least one video must be requested",
            ));
        }
        if self.video.max_poll_attempts == 0 {
            errors.push(ConfigError::warning(
                "video.max_poll_attempts",
                "0 disables the poll cap; a stuck operation will wait forever",
            ));
        }

        if self.assistant.error_reply_fallback.trim().is_empty() {
            errors.push(ConfigError::error(
                "assistant.error_reply_fallback",
                "fallback reply must not be blank",
            ));
        }
        if self.assistant.empty_reply_fallback.trim().is_empty() {
            errors.push(ConfigError::error(
                "assistant.empty_reply_fallback",
                "fallback reply must not be blank",
            ));
        }

        errors
    }
}
