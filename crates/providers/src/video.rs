//! Image-to-video generation as an explicit state machine.
//!
//! ```text
//! Idle → Submitted → Polling{attempt} ─┬→ Completed
//!                       ↑      │       └→ Failed
//!                       └──────┘
//! ```
//!
//! Every call to [`VideoSynthesizer::generate_video`] starts a fresh job
//! from `Idle`; operation handles are never resumed across calls. The wait
//! between status queries is a `tokio::time::sleep`, so the runtime (and an
//! interactive key selector) stays responsive while a job runs.

use std::sync::Arc;
use std::time::Duration;

use nb_domain::config::VideoConfig;
use nb_domain::error::{Error, Result};
use nb_domain::media::{InlineMedia, VideoArtifact};
use nb_domain::ticket::animation_prompt;
use nb_domain::trace::TraceEvent;
use tokio::sync::watch;
use uuid::Uuid;

use crate::traits::{KeySelector, OperationHandle, VideoBackend, VideoParameters, VideoRequest};

/// Observable state of the most recent job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoJobState {
    Idle,
    Submitted,
    Polling { attempt: u32 },
    Completed,
    Failed,
}

impl VideoJobState {
    fn label(self) -> &'static str {
        match self {
            VideoJobState::Idle => "idle",
            VideoJobState::Submitted => "submitted",
            VideoJobState::Polling { .. } => "polling",
            VideoJobState::Completed => "completed",
            VideoJobState::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, VideoJobState::Completed | VideoJobState::Failed)
    }
}

/// How often and how long to query a pending operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until the provider reports completion.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: Some(120),
        }
    }
}

impl PollPolicy {
    pub fn from_config(cfg: &VideoConfig) -> Self {
        Self {
            interval: Duration::from_millis(cfg.poll_interval_ms),
            max_attempts: (cfg.max_poll_attempts > 0).then_some(cfg.max_poll_attempts),
        }
    }
}

/// Drives the submit → poll → fetch protocol against a [`VideoBackend`].
pub struct VideoSynthesizer {
    backend: Arc<dyn VideoBackend>,
    selector: Option<Arc<dyn KeySelector>>,
    policy: PollPolicy,
    parameters: VideoParameters,
    state: watch::Sender<VideoJobState>,
}

impl VideoSynthesizer {
    pub fn new(backend: Arc<dyn VideoBackend>, policy: PollPolicy) -> Self {
        let (state, _) = watch::channel(VideoJobState::Idle);
        Self {
            backend,
            selector: None,
            policy,
            parameters: VideoParameters::default(),
            state,
        }
    }

    pub fn from_config(backend: Arc<dyn VideoBackend>, cfg: &VideoConfig) -> Self {
        Self::new(backend, PollPolicy::from_config(cfg)).with_parameters(VideoParameters {
            number_of_videos: cfg.number_of_videos,
            resolution: cfg.resolution.clone(),
            aspect_ratio: cfg.aspect_ratio.clone(),
        })
    }

    /// Attach the host's interactive key selection capability.
    pub fn with_selector(mut self, selector: Arc<dyn KeySelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_parameters(mut self, parameters: VideoParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn state(&self) -> VideoJobState {
        *self.state.borrow()
    }

    /// Watch state transitions (e.g. to drive a progress indicator).
    pub fn subscribe(&self) -> watch::Receiver<VideoJobState> {
        self.state.subscribe()
    }

    /// Animate `image` according to the incident `description`.
    pub async fn generate_video(
        &self,
        image: InlineMedia,
        description: &str,
    ) -> Result<VideoArtifact> {
        if description.trim().is_empty() {
            return Err(Error::InvalidInput("incident description must not be blank".into()));
        }
        if image.is_empty() {
            return Err(Error::InvalidInput("source image is empty".into()));
        }

        let job_id = Uuid::new_v4();
        self.transition(job_id, VideoJobState::Idle);

        let request = VideoRequest {
            prompt: animation_prompt(description),
            image,
            parameters: self.parameters.clone(),
        };

        let (result, prompted) = match self.preflight().await {
            Ok(prompted) => (self.run(job_id, &request).await, prompted),
            Err(e) => (Err(e), true),
        };

        match result {
            Ok(artifact) => {
                self.transition(job_id, VideoJobState::Completed);
                tracing::info!(job_id = %job_id, video = %artifact.id, "video generated");
                Ok(artifact)
            }
            Err(e) => {
                self.transition(job_id, VideoJobState::Failed);
                tracing::warn!(job_id = %job_id, error = %e, "video generation failed");
                // The user was already asked for a key during this call.
                if e.is_credential_rejection() && !prompted {
                    self.recover_credentials(&e).await;
                }
                Err(e)
            }
        }
    }

    /// Ask the host for a key if none is selected yet. Returns whether the
    /// selector was opened.
    async fn preflight(&self) -> Result<bool> {
        let Some(selector) = &self.selector else {
            return Ok(false);
        };
        if selector.has_selected_key().await {
            return Ok(false);
        }
        TraceEvent::KeySelectionOpened {
            reason: "preflight".into(),
        }
        .emit();
        selector.open_select_key().await?;
        Ok(true)
    }

    /// Reopen key selection once after a credential rejection. The
    /// operation itself is not retried.
    async fn recover_credentials(&self, cause: &Error) {
        let Some(selector) = &self.selector else {
            return;
        };
        TraceEvent::KeySelectionOpened {
            reason: cause.to_string(),
        }
        .emit();
        if let Err(e) = selector.open_select_key().await {
            tracing::warn!(error = %e, "key selection after credential rejection failed");
        }
    }

    async fn run(&self, job_id: Uuid, request: &VideoRequest) -> Result<VideoArtifact> {
        let mut handle: OperationHandle = self.backend.submit(request).await?;
        self.transition(job_id, VideoJobState::Submitted);

        let mut attempt: u32 = 0;
        let status = loop {
            if let Some(max) = self.policy.max_attempts {
                if attempt >= max {
                    return Err(Error::Timeout(format!(
                        "video operation {} still running after {attempt} status checks",
                        handle.name
                    )));
                }
            }

            tokio::time::sleep(self.policy.interval).await;
            attempt += 1;
            self.transition(job_id, VideoJobState::Polling { attempt });

            let status = self.backend.poll(&handle).await?;
            handle = status.handle.clone();
            if status.done {
                break status;
            }
        };

        if let Some(message) = status.error {
            return Err(Error::provider(self.backend.provider_id(), message));
        }
        let uri = status.video_uri.ok_or_else(|| {
            Error::provider(self.backend.provider_id(), "video generation failed")
        })?;

        self.backend.fetch(&uri).await
    }

    fn transition(&self, job_id: Uuid, next: VideoJobState) {
        self.state.send_replace(next);
        let attempt = match next {
            VideoJobState::Polling { attempt } => attempt,
            _ => 0,
        };
        TraceEvent::VideoJobTransition {
            job_id: job_id.to_string(),
            state: next.label().into(),
            attempt,
        }
        .emit();
    }
}

impl std::fmt::Debug for VideoSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSynthesizer")
            .field("provider", &self.backend.provider_id())
            .field("selector", &self.selector.is_some())
            .field("policy", &self.policy)
            .field("state", &self.state())
            .finish()
    }
}
