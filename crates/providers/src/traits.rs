use nb_domain::error::Result;
use nb_domain::media::{InlineMedia, VideoArtifact};
use nb_domain::turn::ConversationTurn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fixed generation settings sent with every video submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoParameters {
    pub number_of_videos: u32,
    /// Resolution tier, e.g. `"720p"`.
    pub resolution: String,
    /// Aspect ratio, e.g. `"16:9"`.
    pub aspect_ratio: String,
}

impl Default for VideoParameters {
    fn default() -> Self {
        Self {
            number_of_videos: 1,
            resolution: "720p".into(),
            aspect_ratio: "16:9".into(),
        }
    }
}

/// A request to start a long-running image-to-video operation.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    /// Full prompt, already wrapped in the animation template.
    pub prompt: String,
    pub image: InlineMedia,
    pub parameters: VideoParameters,
}

/// Opaque reference to a provider-side long-running operation.
///
/// The provider may hand back a different handle on every status query;
/// always poll with the most recent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    pub name: String,
}

impl OperationHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Result of one status query.
#[derive(Debug, Clone)]
pub struct OperationStatus {
    /// Refreshed handle to use for the next query.
    pub handle: OperationHandle,
    pub done: bool,
    /// URI of the first generated video, once available.
    pub video_uri: Option<String>,
    /// Error reported by the provider for a finished operation.
    pub error: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provider traits
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Synchronous-style text operations against the provider.
#[async_trait::async_trait]
pub trait AiGateway: Send + Sync {
    /// Produce the assistant's next reply.
    ///
    /// The last turn of `transcript` is the active message; everything
    /// before it is sent as context.
    async fn generate_reply(&self, transcript: &[ConversationTurn]) -> Result<String>;

    /// Transcribe a recorded audio clip in a single request.
    async fn transcribe_audio(&self, audio: &InlineMedia) -> Result<String>;

    fn provider_id(&self) -> &str;
}

/// The provider side of the long-running video protocol.
///
/// Sequencing (preflight, polling, recovery) lives in
/// [`crate::video::VideoSynthesizer`]; implementations only translate
/// single calls to the wire.
#[async_trait::async_trait]
pub trait VideoBackend: Send + Sync {
    async fn submit(&self, request: &VideoRequest) -> Result<OperationHandle>;

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus>;

    /// Download a generated video. The active credential is attached by
    /// the implementation.
    async fn fetch(&self, uri: &str) -> Result<VideoArtifact>;

    fn provider_id(&self) -> &str;
}

/// Interactive key selection offered by the host environment.
#[async_trait::async_trait]
pub trait KeySelector: Send + Sync {
    async fn has_selected_key(&self) -> bool;

    /// Let the user pick a key. Resolves once the selection flow has ended.
    async fn open_select_key(&self) -> Result<()>;
}
