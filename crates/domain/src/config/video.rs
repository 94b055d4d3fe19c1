use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Image-to-video generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Settings for the "animate this error" workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "d_video_model")]
    pub model: String,
    /// Wait between operation status queries.
    #[serde(default = "d_5000u")]
    pub poll_interval_ms: u64,
    /// Maximum number of status queries before giving up with a timeout.
    /// `0` polls until the provider reports completion.
    #[serde(default = "d_120")]
    pub max_poll_attempts: u32,
    #[serde(default = "d_1")]
    pub number_of_videos: u32,
    #[serde(default = "d_resolution")]
    pub resolution: String,
    #[serde(default = "d_aspect_ratio")]
    pub aspect_ratio: String,
    /// Directory the CLI writes downloaded videos into.
    #[serde(default = "d_output_dir")]
    pub output_dir: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            model: d_video_model(),
            poll_interval_ms: 5_000,
            max_poll_attempts: 120,
            number_of_videos: 1,
            resolution: d_resolution(),
            aspect_ratio: d_aspect_ratio(),
            output_dir: d_output_dir(),
        }
    }
}

fn d_video_model() -> String {
    "veo-3.1-fast-generate-preview".into()
}
fn d_5000u() -> u64 {
    5_000
}
fn d_120() -> u32 {
    120
}
fn d_1() -> u32 {
    1
}
fn d_resolution() -> String {
    "720p".into()
}
fn d_aspect_ratio() -> String {
    "16:9".into()
}
fn d_output_dir() -> String {
    "./videos".into()
}
