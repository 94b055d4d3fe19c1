use nb_domain::config::{AuthConfig, Config, ConfigSeverity};
use nb_providers::auth::{keychain_fallback_env_name, store_in_keychain};

const DEFAULT_SERVICE: &str = "neurobot";
const DEFAULT_ACCOUNT: &str = "gemini-api-key";

/// Parse and validate the config, printing any issues.
///
/// Returns `false` when at least one error was found.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!("\n{error_count} error(s), {warning_count} warning(s) in {config_path}");

    error_count == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
///
/// A plaintext `llm.auth.key` is masked.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let mut masked = config.clone();
    if let Some(key) = masked.llm.auth.key.as_mut() {
        *key = mask(key);
    }
    print!("{}", toml::to_string_pretty(&masked)?);
    Ok(())
}

/// Prompt for the API key and store it in the OS keychain under the
/// configured `service`/`account` (or the defaults).
pub fn set_secret(config: &Config) -> anyhow::Result<()> {
    let auth = &config.llm.auth;
    let service = auth.service.as_deref().unwrap_or(DEFAULT_SERVICE);
    let account = auth.account.as_deref().unwrap_or(DEFAULT_ACCOUNT);

    let secret = rpassword::prompt_password_stderr("API key (input hidden): ")?;
    let secret = secret.trim();
    if secret.is_empty() {
        anyhow::bail!("no key entered");
    }

    store_in_keychain(service, account, secret)?;
    eprintln!("Stored key in keychain (service={service}, account={account}).");

    if needs_keychain_hint(auth) {
        eprintln!();
        eprintln!("To use it, set in config.toml:");
        eprintln!("  [llm.auth]");
        eprintln!("  service = \"{service}\"");
        eprintln!("  account = \"{account}\"");
    }
    eprintln!(
        "Headless hosts without a keychain can export {} instead.",
        keychain_fallback_env_name(service, account)
    );
    Ok(())
}

/// The keychain is only consulted when both `service` and `account` are
/// configured.
fn needs_keychain_hint(auth: &AuthConfig) -> bool {
    auth.service.is_none() || auth.account.is_none()
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "****".into()
    } else {
        format!("{visible}****")
    }
}
