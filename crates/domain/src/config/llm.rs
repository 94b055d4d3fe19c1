use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generative-AI provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Connection settings for the generative-AI provider used by the
/// assistant (chat + transcription) and the video workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Identifier used in logs and error messages.
    #[serde(default = "d_provider_id")]
    pub provider_id: String,
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Model used for chat replies and audio transcription.
    #[serde(default = "d_chat_model")]
    pub chat_model: String,
    /// System instruction sent with every chat request.
    #[serde(default = "d_system_instruction")]
    pub system_instruction: String,
    /// Per-request HTTP timeout.
    #[serde(default = "d_120000u")]
    pub request_timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider_id: d_provider_id(),
            base_url: d_base_url(),
            auth: AuthConfig::default(),
            chat_model: d_chat_model(),
            system_instruction: d_system_instruction(),
            request_timeout_ms: 120_000,
        }
    }
}

/// Where the API key comes from.
///
/// Precedence at resolution time: `key`, then keychain
/// (`service` + `account`), then `env`, then the headless
/// `{SERVICE}_{ACCOUNT}` env fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Env var containing the key.
    #[serde(default = "d_key_env")]
    pub env: Option<String>,
    /// Direct key (for config-only setups; prefer env or keychain).
    #[serde(default)]
    pub key: Option<String>,
    /// Keychain service name (e.g., "neurobot").
    #[serde(default)]
    pub service: Option<String>,
    /// Keychain account name (e.g., "gemini-api-key").
    #[serde(default)]
    pub account: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            env: d_key_env(),
            key: None,
            service: None,
            account: None,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_provider_id() -> String {
    "google".into()
}
fn d_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn d_chat_model() -> String {
    "gemini-3-flash-preview".into()
}
fn d_system_instruction() -> String {
    "Eres NeuroBOT Bot, el asistente virtual experto de la plataforma NeuroBOT. \
     Ayudas a los empleados con problemas técnicos, consultas de tickets y \
     procedimientos internos de forma profesional y eficiente."
        .into()
}
fn d_key_env() -> Option<String> {
    Some("API_KEY".into())
}
fn d_120000u() -> u64 {
    120_000
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
