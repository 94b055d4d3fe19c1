pub mod auth;
pub mod google;
pub mod traits;
pub mod video;
pub(crate) mod util;

// Re-exports for convenience.
pub use auth::KeyStore;
pub use google::GoogleProvider;
pub use traits::{
    AiGateway, KeySelector, OperationHandle, OperationStatus, VideoBackend, VideoParameters,
    VideoRequest,
};
pub use video::{PollPolicy, VideoJobState, VideoSynthesizer};
