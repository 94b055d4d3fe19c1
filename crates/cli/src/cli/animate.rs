//! `neurobot animate <image> <description>`: turn an incident screenshot
//! into a short support video, optionally opening a ticket for it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nb_domain::config::Config;
use nb_domain::media::{InlineMedia, VideoArtifact};
use nb_domain::ticket::{Category, Priority, TicketDraft};
use nb_providers::VideoJobState;

use crate::bootstrap;

const POLL_MESSAGES: [&str; 4] = [
    "Sintetizando vectores de movimiento...",
    "Reconstruyendo entorno 3D...",
    "Generando visualización de falla...",
    "Finalizando animación de soporte...",
];

pub struct AnimateArgs {
    pub image: PathBuf,
    pub description: String,
    pub output_dir: Option<PathBuf>,
    pub ticket: bool,
    pub priority: Priority,
    pub category: Category,
}

pub async fn animate(config: Arc<Config>, args: AnimateArgs) -> anyhow::Result<()> {
    let rt = bootstrap::build_runtime(config)?;

    let mut draft = TicketDraft::new(args.description);
    draft.priority = args.priority;
    draft.category = args.category;
    draft.attach(InlineMedia::from_path(&args.image)?);

    let image = draft.begin_animation()?.source_image.clone();
    let synth = rt.synthesizer(true);

    let mut rx = synth.subscribe();
    let progress = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = *rx.borrow_and_update();
            if let Some(msg) = progress_message(state) {
                eprintln!("  {msg}");
            }
            if state.is_terminal() {
                break;
            }
        }
    });

    draft.animation_progressed()?;
    let result = synth.generate_video(image, &draft.description).await;
    // The sender lives in `synth`; dropping it ends the progress task.
    drop(synth);
    progress.await.ok();

    let artifact = match result {
        Ok(artifact) => artifact,
        Err(e) => {
            draft.fail_animation()?;
            eprintln!("Hubo un error generando la animación. Por favor intenta de nuevo.");
            return Err(e.into());
        }
    };

    let out_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&rt.config.video.output_dir));
    let path = write_artifact(&out_dir, &artifact)?;
    eprintln!("Video guardado en {}", path.display());
    draft.finish_animation(artifact)?;

    if args.ticket {
        let ticket = draft.submit()?;
        println!("{}", serde_json::to_string_pretty(&ticket)?);
    }
    Ok(())
}

fn progress_message(state: VideoJobState) -> Option<&'static str> {
    match state {
        VideoJobState::Submitted => Some("Analizando escena..."),
        VideoJobState::Polling { attempt } => {
            let idx = attempt.saturating_sub(1) as usize % POLL_MESSAGES.len();
            Some(POLL_MESSAGES[idx])
        }
        VideoJobState::Idle | VideoJobState::Completed | VideoJobState::Failed => None,
    }
}

fn write_artifact(dir: &Path, artifact: &VideoArtifact) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("creating {}: {e}", dir.display()))?;
    let path = dir.join(artifact.file_name());
    std::fs::write(&path, &artifact.bytes)
        .map_err(|e| anyhow::anyhow!("writing {}: {e}", path.display()))?;
    Ok(path)
}
