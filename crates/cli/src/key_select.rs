//! Terminal implementation of interactive key selection.

use std::sync::Arc;

use nb_domain::error::{Error, Result};
use nb_providers::{KeySelector, KeyStore};

type Prompt = dyn Fn() -> std::io::Result<String> + Send + Sync;

/// Prompts for an API key on the terminal (input hidden) and stores it in
/// the shared [`KeyStore`].
pub struct TerminalKeySelector {
    keys: Arc<KeyStore>,
    prompt: Arc<Prompt>,
}

impl TerminalKeySelector {
    pub fn new(keys: Arc<KeyStore>) -> Self {
        Self::with_prompt(keys, || {
            rpassword::prompt_password_stderr("Google API key (input hidden): ")
        })
    }

    pub fn with_prompt(
        keys: Arc<KeyStore>,
        prompt: impl Fn() -> std::io::Result<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            keys,
            prompt: Arc::new(prompt),
        }
    }
}

#[async_trait::async_trait]
impl KeySelector for TerminalKeySelector {
    async fn has_selected_key(&self) -> bool {
        self.keys.is_selected()
    }

    async fn open_select_key(&self) -> Result<()> {
        let prompt = self.prompt.clone();
        let entered = tokio::task::spawn_blocking(move || prompt())
            .await
            .map_err(|e| Error::Auth(format!("key prompt aborted: {e}")))??;

        let key = entered.trim();
        if key.is_empty() {
            // Keep whatever was selected before.
            eprintln!("No key entered.");
            return Ok(());
        }
        self.keys.select(key);
        Ok(())
    }
}
