//! Helpdesk tickets and the ticket-creation draft.
//!
//! A [`TicketDraft`] owns at most one [`VideoSynthesisJob`]. The draft refuses
//! to start a second animation while the current one is still running, and
//! clearing the attachment discards the job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::media::{InlineMedia, VideoArtifact};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tickets
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(rename = "Abierto")]
    Open,
    #[serde(rename = "En Progreso")]
    InProgress,
    #[serde(rename = "Acción Requerida")]
    ActionRequired,
    #[serde(rename = "Cerrado")]
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Baja")]
    Low,
    #[default]
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Crítica")]
    Critical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Hardware,
    Software,
    #[serde(rename = "Redes")]
    Network,
    #[serde(rename = "Accesos")]
    Access,
    #[default]
    #[serde(rename = "Otros")]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub priority: Priority,
    pub category: Category,
    /// Local handle of the animation attached at submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Uuid>,
}

const TITLE_MAX_CHARS: usize = 60;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Video synthesis job
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build the provider prompt for an incident description.
pub fn animation_prompt(description: &str) -> String {
    format!(
        "Animate this scene showing: {}. Professional technical visualization style.",
        description.trim()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoJobStatus {
    Submitted,
    Polling,
    Done,
    Failed,
}

impl VideoJobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, VideoJobStatus::Done | VideoJobStatus::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct VideoSynthesisJob {
    pub source_image: InlineMedia,
    pub prompt: String,
    status: VideoJobStatus,
    result: Option<VideoArtifact>,
}

impl VideoSynthesisJob {
    pub fn status(&self) -> VideoJobStatus {
        self.status
    }

    /// The playable result. Only present once the job is done.
    pub fn result(&self) -> Option<&VideoArtifact> {
        self.result.as_ref()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Draft
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Form state for a ticket that has not been submitted yet.
#[derive(Debug, Clone, Default)]
pub struct TicketDraft {
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    attachment: Option<InlineMedia>,
    job: Option<VideoSynthesisJob>,
}

impl TicketDraft {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn attachment(&self) -> Option<&InlineMedia> {
        self.attachment.as_ref()
    }

    pub fn animation(&self) -> Option<&VideoSynthesisJob> {
        self.job.as_ref()
    }

    /// Replace the attachment. Any animation of the previous image is dropped.
    pub fn attach(&mut self, image: InlineMedia) {
        self.attachment = Some(image);
        self.job = None;
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
        self.job = None;
    }

    /// Whether an animation is currently running for this draft.
    pub fn animation_in_flight(&self) -> bool {
        self.job.as_ref().is_some_and(|j| !j.status.is_terminal())
    }

    /// Start a new animation job for the current attachment.
    ///
    /// Fails with [`Error::InvalidInput`] when there is no attachment, the
    /// description is blank, or another job is still running.
    pub fn begin_animation(&mut self) -> Result<&VideoSynthesisJob> {
        if self.animation_in_flight() {
            return Err(Error::InvalidInput(
                "an animation is already being generated for this ticket".into(),
            ));
        }
        let image = self
            .attachment
            .clone()
            .ok_or_else(|| Error::InvalidInput("attach an image before animating".into()))?;
        if self.description.trim().is_empty() {
            return Err(Error::InvalidInput(
                "describe the incident before animating".into(),
            ));
        }

        let job = self.job.insert(VideoSynthesisJob {
            source_image: image,
            prompt: animation_prompt(&self.description),
            status: VideoJobStatus::Submitted,
            result: None,
        });
        Ok(&*job)
    }

    /// Mark the running job as being polled by the provider.
    pub fn animation_progressed(&mut self) -> Result<()> {
        let job = self.active_job()?;
        job.status = VideoJobStatus::Polling;
        Ok(())
    }

    pub fn finish_animation(&mut self, artifact: VideoArtifact) -> Result<()> {
        let job = self.active_job()?;
        job.status = VideoJobStatus::Done;
        job.result = Some(artifact);
        Ok(())
    }

    pub fn fail_animation(&mut self) -> Result<()> {
        let job = self.active_job()?;
        job.status = VideoJobStatus::Failed;
        Ok(())
    }

    fn active_job(&mut self) -> Result<&mut VideoSynthesisJob> {
        match self.job.as_mut() {
            Some(job) if !job.status.is_terminal() => Ok(job),
            _ => Err(Error::InvalidInput("no animation in progress".into())),
        }
    }

    /// Turn the draft into an open ticket.
    pub fn submit(&self) -> Result<Ticket> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::InvalidInput("ticket description must not be blank".into()));
        }

        let first_line = description.lines().next().unwrap_or(description);
        let title: String = if first_line.chars().count() > TITLE_MAX_CHARS {
            let mut t: String = first_line.chars().take(TITLE_MAX_CHARS - 1).collect();
            t.push('…');
            t
        } else {
            first_line.to_string()
        };

        let id = Uuid::new_v4().simple().to_string();
        Ok(Ticket {
            id: format!("#{}", id[..6].to_uppercase()),
            title,
            description: description.to_string(),
            status: TicketStatus::Open,
            created_at: Utc::now(),
            priority: self.priority,
            category: self.category,
            animation: self
                .job
                .as_ref()
                .and_then(|j| j.result.as_ref())
                .map(|a| a.id),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
