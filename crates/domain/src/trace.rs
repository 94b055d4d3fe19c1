use serde::Serialize;

/// Structured trace events emitted across all NeuroBOT crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    LlmRequest {
        provider: String,
        model: String,
        operation: String,
        duration_ms: u64,
        ok: bool,
    },
    ReplyAppended {
        turns: usize,
        fallback: bool,
    },
    VideoJobTransition {
        job_id: String,
        state: String,
        attempt: u32,
    },
    KeySelectionOpened {
        reason: String,
    },
    ProfileStored {
        email: String,
    },
    ProfileCleared,
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "nb_event");
    }
}
