use nb_domain::config::{Config, ConfigSeverity};

#[test]
fn default_config_targets_gemini() {
    let config = Config::default();
    assert_eq!(config.llm.base_url, "https://generativelanguage.googleapis.com");
    assert_eq!(config.llm.chat_model, "gemini-3-flash-preview");
    assert_eq!(config.video.model, "veo-3.1-fast-generate-preview");
}

#[test]
fn default_config_has_no_errors() {
    let issues = Config::default().validate();
    assert!(
        issues.iter().all(|i| i.severity != ConfigSeverity::Error),
        "unexpected errors: {issues:?}"
    );
}

#[test]
fn explicit_sections_parse() {
    let toml_str = r#"
[llm]
chat_model = "gemini-2.5-flash"

[llm.auth]
env = "GEMINI_API_KEY"

[video]
poll_interval_ms = 2000
max_poll_attempts = 30

[assistant]
greeting = ""
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.llm.chat_model, "gemini-2.5-flash");
    assert_eq!(config.llm.auth.env.as_deref(), Some("GEMINI_API_KEY"));
    assert_eq!(config.video.poll_interval_ms, 2000);
    assert_eq!(config.video.max_poll_attempts, 30);
    assert!(config.assistant.greeting.is_empty());
    // Untouched sections keep their defaults.
    assert_eq!(config.video.resolution, "720p");
}

#[test]
fn zero_poll_interval_is_an_error() {
    let config: Config = toml::from_str("[video]\npoll_interval_ms = 0").unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.field == "video.poll_interval_ms" && i.severity == ConfigSeverity::Error));
}

#[test]
fn unbounded_polling_is_a_warning() {
    let config: Config = toml::from_str("[video]\nmax_poll_attempts = 0").unwrap();
    let issue = config
        .validate()
        .into_iter()
        .find(|i| i.field == "video.max_poll_attempts")
        .expect("expected a poll cap warning");
    assert_eq!(issue.severity, ConfigSeverity::Warning);
}

#[test]
fn half_configured_keychain_is_an_error() {
    let config: Config = toml::from_str("[llm.auth]\nservice = \"neurobot\"").unwrap();
    assert!(config
        .validate()
        .iter()
        .any(|i| i.field == "llm.auth" && i.severity == ConfigSeverity::Error));
}
