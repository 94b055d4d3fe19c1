//! `neurobot transcribe <file>`: one-shot speech-to-text.
//!
//! Errors are reported as-is; retrying is left to the caller.

use std::path::PathBuf;
use std::sync::Arc;

use nb_domain::config::Config;

use crate::bootstrap;

pub async fn transcribe(config: Arc<Config>, path: PathBuf) -> anyhow::Result<()> {
    let rt = bootstrap::build_runtime(config)?;
    let text = super::chat::transcribe_file(rt.google.as_ref(), &path).await?;
    println!("{}", text.trim());
    Ok(())
}
