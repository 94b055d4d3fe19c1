//! Wiring shared by every command: one key store, one provider adapter,
//! and the services built on top of them.

use std::sync::Arc;

use nb_domain::config::Config;
use nb_providers::{GoogleProvider, KeyStore, VideoSynthesizer};
use nb_sessions::{ConversationManager, ProfileStore};

use crate::key_select::TerminalKeySelector;

pub struct Runtime {
    pub config: Arc<Config>,
    pub keys: Arc<KeyStore>,
    pub google: Arc<GoogleProvider>,
}

/// Resolve the API key and build the provider adapter.
///
/// A missing key is not an error here; commands that need one fail on
/// first use (or prompt for one, for `animate`).
pub fn build_runtime(config: Arc<Config>) -> anyhow::Result<Runtime> {
    let keys = Arc::new(KeyStore::from_auth_config(&config.llm.auth));
    let google = Arc::new(GoogleProvider::from_config(&config, keys.clone())?);
    tracing::debug!(
        provider = %config.llm.provider_id,
        key_selected = keys.is_selected(),
        "runtime ready"
    );
    Ok(Runtime { config, keys, google })
}

impl Runtime {
    pub fn conversation(&self) -> ConversationManager {
        ConversationManager::from_config(self.google.clone(), &self.config.assistant)
    }

    /// Video synthesizer. With `interactive`, a terminal prompt is offered
    /// when no key is selected or the provider rejects the current one.
    pub fn synthesizer(&self, interactive: bool) -> VideoSynthesizer {
        let synth = VideoSynthesizer::from_config(self.google.clone(), &self.config.video);
        if interactive {
            synth.with_selector(Arc::new(TerminalKeySelector::new(self.keys.clone())))
        } else {
            synth
        }
    }

    pub fn profiles(&self) -> anyhow::Result<ProfileStore> {
        Ok(ProfileStore::from_config(
            self.config.session.profile_path.as_deref(),
        )?)
    }
}
