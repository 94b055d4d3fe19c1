//! Shared utility functions for provider adapters.

use nb_domain::config::AuthConfig;
use nb_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`]. The request URL carries the API key, so it is
/// stripped from the message.
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    let timeout = e.is_timeout();
    let message = redact_url_key(&e.without_url().to_string());
    if timeout {
        Error::Timeout(message)
    } else {
        Error::Http(message)
    }
}

/// Classify a non-success provider response.
///
/// 401/403 and Google's `API_KEY_INVALID` (sent as a 400) mean the
/// credential was rejected; everything else is a provider error.
pub(crate) fn status_error(provider: &str, status: reqwest::StatusCode, body: &str) -> Error {
    let message = format!("HTTP {} - {}", status.as_u16(), body);
    if status == reqwest::StatusCode::UNAUTHORIZED
        || status == reqwest::StatusCode::FORBIDDEN
        || body.contains("API_KEY_INVALID")
    {
        Error::Auth(message)
    } else {
        Error::provider(provider, message)
    }
}

/// Append `key={api_key}` to a URL that may or may not already carry a
/// query string.
pub(crate) fn with_key_param(url: &str, api_key: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}key={api_key}")
}

/// Redact API key from URL for safe logging.
pub(crate) fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

/// Resolve the API key from an [`AuthConfig`].
///
/// Precedence:
/// 1. `key` field (plaintext, logged as a warning)
/// 2. `service` + `account` → OS keychain via `keyring`
/// 3. `env` field (reads environment variable)
/// 4. Fallback when `service` + `account` are set: env var `{SERVICE}_{ACCOUNT}` uppercased
/// 5. Error
pub fn resolve_api_key(auth: &AuthConfig) -> Result<String> {
    // 1. Plaintext key (warn the user)
    if let Some(ref key) = auth.key {
        tracing::warn!(
            "API key loaded from plaintext config field 'key'; \
             prefer 'env' or the OS keychain instead"
        );
        return Ok(key.clone());
    }

    // 2. OS keychain via service + account
    if let (Some(ref service), Some(ref account)) = (&auth.service, &auth.account) {
        match resolve_from_keychain(service, account) {
            Ok(secret) => return Ok(secret),
            Err(e) => {
                tracing::warn!(
                    service = %service,
                    account = %account,
                    error = %e,
                    "keychain lookup failed, falling through to env"
                );
            }
        }
    }

    // 3. Env var
    if let Some(ref env_var) = auth.env {
        match std::env::var(env_var) {
            Ok(val) if !val.is_empty() => return Ok(val),
            _ => tracing::debug!(env_var = %env_var, "API key env var not set"),
        }
    }

    // 4. Headless fallback: {SERVICE}_{ACCOUNT} uppercased
    if let (Some(ref service), Some(ref account)) = (&auth.service, &auth.account) {
        let fallback_var = keychain_fallback_env_name(service, account);
        if let Ok(val) = std::env::var(&fallback_var) {
            tracing::info!(
                env_var = %fallback_var,
                "API key resolved from keychain headless fallback env var"
            );
            return Ok(val);
        }
    }

    // 5. No key found
    Err(Error::Auth(match auth.env {
        Some(ref env_var) => format!(
            "no API key configured: environment variable '{env_var}' not set \
             and no 'key' or keychain 'service'+'account' available"
        ),
        None => "no API key configured: set 'key', 'env', or keychain \
                 'service'+'account' in [llm.auth]"
            .into(),
    }))
}

/// Try to read a secret from the OS keychain.
///
/// Returns an error on headless systems where no keychain daemon is available.
pub fn resolve_from_keychain(service: &str, account: &str) -> Result<String> {
    let entry = keyring::Entry::new(service, account)
        .map_err(|e| Error::Auth(format!("keyring entry creation failed: {e}")))?;
    entry
        .get_password()
        .map_err(|e| Error::Auth(format!("keyring get_password failed: {e}")))
}

/// Store a secret in the OS keychain.
pub fn store_in_keychain(service: &str, account: &str, secret: &str) -> Result<()> {
    let entry = keyring::Entry::new(service, account)
        .map_err(|e| Error::Auth(format!("keyring entry creation failed: {e}")))?;
    entry
        .set_password(secret)
        .map_err(|e| Error::Auth(format!("keyring set_password failed: {e}")))
}

/// Build the headless fallback env var name for a keychain service/account.
///
/// Example: `("neurobot", "gemini-api-key")` → `"NEUROBOT_GEMINI_API_KEY"`.
pub fn keychain_fallback_env_name(service: &str, account: &str) -> String {
    format!(
        "{}_{}",
        service.to_uppercase().replace('-', "_"),
        account.to_uppercase().replace('-', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_env_name_basic() {
        assert_eq!(
            keychain_fallback_env_name("neurobot", "gemini-api-key"),
            "NEUROBOT_GEMINI_API_KEY"
        );
    }

    #[test]
    fn resolve_api_key_plaintext() {
        let auth = AuthConfig {
            key: Some("sk-test-123".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "sk-test-123");
    }

    #[test]
    fn resolve_api_key_env_var() {
        let var_name = "NB_TEST_RESOLVE_ENV_KEY_1234";
        std::env::set_var(var_name, "env-secret-value");
        let auth = AuthConfig {
            env: Some(var_name.into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "env-secret-value");
        std::env::remove_var(var_name);
    }

    #[test]
    fn resolve_api_key_env_var_missing() {
        let auth = AuthConfig {
            env: Some("NB_TEST_NONEXISTENT_VAR_8888".into()),
            ..Default::default()
        };
        let err = resolve_api_key(&auth).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("NB_TEST_NONEXISTENT_VAR_8888"));
    }

    #[test]
    fn resolve_api_key_no_source() {
        let auth = AuthConfig {
            env: None,
            ..Default::default()
        };
        let err = resolve_api_key(&auth).unwrap_err();
        assert!(err.to_string().contains("no API key configured"));
    }

    #[test]
    fn resolve_api_key_keychain_fallback_env() {
        // No keychain daemon in CI, so this falls through to the headless
        // fallback variable.
        let fallback_var = "NEUROBOT_FALLBACK_PROVIDER";
        std::env::set_var(fallback_var, "fallback-secret");
        let auth = AuthConfig {
            service: Some("neurobot".into()),
            account: Some("fallback-provider".into()),
            env: None,
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "fallback-secret");
        std::env::remove_var(fallback_var);
    }

    #[test]
    fn key_param_respects_existing_query() {
        assert_eq!(
            with_key_param("https://x/v1/files/abc:download?alt=media", "k"),
            "https://x/v1/files/abc:download?alt=media&key=k"
        );
        assert_eq!(with_key_param("https://x/v", "k"), "https://x/v?key=k");
    }

    #[test]
    fn redact_hides_key_and_keeps_tail() {
        assert_eq!(
            redact_url_key("https://x/m:gen?key=secret&alt=sse"),
            "https://x/m:gen?key=[REDACTED]&alt=sse"
        );
        assert_eq!(redact_url_key("https://x/no-key"), "https://x/no-key");
    }

    #[test]
    fn status_error_classifies_credential_failures() {
        let e = status_error("google", reqwest::StatusCode::FORBIDDEN, "denied");
        assert!(matches!(e, Error::Auth(_)));
        let e = status_error(
            "google",
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":{"status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#,
        );
        assert!(matches!(e, Error::Auth(_)));
        let e = status_error("google", reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(e, Error::Provider { .. }));
    }
}
