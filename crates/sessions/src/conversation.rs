//! Append-only assistant conversation.
//!
//! [`ConversationManager::request_reply`] takes `&mut self`, so a manager
//! can only have one reply in flight; the transcript sent for a request is
//! exactly the turns appended before it started.

use std::sync::Arc;

use nb_domain::config::AssistantConfig;
use nb_domain::error::{Error, Result};
use nb_domain::trace::TraceEvent;
use nb_domain::turn::ConversationTurn;
use nb_providers::AiGateway;

pub struct ConversationManager {
    gateway: Arc<dyn AiGateway>,
    transcript: Vec<ConversationTurn>,
    empty_reply_fallback: String,
    error_reply_fallback: String,
}

impl ConversationManager {
    /// A conversation using the default greeting and fallback strings.
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self::from_config(gateway, &AssistantConfig::default())
    }

    pub fn from_config(gateway: Arc<dyn AiGateway>, cfg: &AssistantConfig) -> Self {
        let mut transcript = Vec::new();
        if !cfg.greeting.trim().is_empty() {
            transcript.push(ConversationTurn::assistant(cfg.greeting.clone()));
        }
        Self {
            gateway,
            transcript,
            empty_reply_fallback: cfg.empty_reply_fallback.clone(),
            error_reply_fallback: cfg.error_reply_fallback.clone(),
        }
    }

    /// Append a user turn. Blank text is rejected and leaves the
    /// transcript untouched.
    pub fn append_user_message(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("message must not be blank".into()));
        }
        self.transcript.push(ConversationTurn::user(text));
        Ok(())
    }

    /// Ask the gateway for the next assistant turn and append it.
    ///
    /// Gateway failures never escape: the appended turn carries a fixed
    /// apology instead. Only calling this without a pending user turn is
    /// an error.
    pub async fn request_reply(&mut self) -> Result<&ConversationTurn> {
        if !self.transcript.last().is_some_and(ConversationTurn::is_user) {
            return Err(Error::InvalidInput(
                "no user message is waiting for a reply".into(),
            ));
        }

        let (text, fallback) = match self.gateway.generate_reply(&self.transcript).await {
            Ok(reply) if reply.trim().is_empty() => (self.empty_reply_fallback.clone(), true),
            Ok(reply) => (reply, false),
            Err(e) => {
                tracing::warn!(
                    provider = %self.gateway.provider_id(),
                    error = %e,
                    "assistant reply failed, using fallback"
                );
                (self.error_reply_fallback.clone(), true)
            }
        };

        self.transcript.push(ConversationTurn::assistant(text));
        TraceEvent::ReplyAppended {
            turns: self.transcript.len(),
            fallback,
        }
        .emit();

        Ok(self.last_turn())
    }

    /// Append `text` as a user turn and wait for the reply.
    pub async fn send(&mut self, text: &str) -> Result<&ConversationTurn> {
        self.append_user_message(text)?;
        self.request_reply().await
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.transcript.last()
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    // Only called right after a push.
    fn last_turn(&self) -> &ConversationTurn {
        &self.transcript[self.transcript.len() - 1]
    }
}

impl std::fmt::Debug for ConversationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationManager")
            .field("provider", &self.gateway.provider_id())
            .field("turns", &self.transcript.len())
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
