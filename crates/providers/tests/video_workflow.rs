//! End-to-end tests for the video state machine against scripted test
//! doubles. Time is paused, so the poll interval elapses instantly.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nb_domain::error::{Error, ErrorKind, Result, ENTITY_NOT_FOUND};
use nb_domain::media::{InlineMedia, VideoArtifact};
use nb_providers::{
    KeySelector, OperationHandle, OperationStatus, PollPolicy, VideoBackend, VideoJobState,
    VideoRequest, VideoSynthesizer,
};
use parking_lot::Mutex;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Test doubles
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
struct ScriptedBackend {
    submit_error: Mutex<Option<Error>>,
    /// Each poll pops one entry; the handle name returned is `op-<n>`.
    script: Mutex<VecDeque<Poll>>,
    polled_with: Mutex<Vec<String>>,
    submitted: Mutex<Vec<VideoRequest>>,
    fetches: AtomicUsize,
}

enum Poll {
    Pending,
    Done(Option<&'static str>),
    Failed(&'static str),
    Rejected(&'static str),
}

impl ScriptedBackend {
    fn pending_then_done(pending: usize) -> Arc<Self> {
        let mut script: VecDeque<Poll> = (0..pending).map(|_| Poll::Pending).collect();
        script.push_back(Poll::Done(Some("https://videos.example/v1/files/abc:download?alt=media")));
        Arc::new(Self {
            script: Mutex::new(script),
            ..Self::default()
        })
    }

    fn polls(&self) -> usize {
        self.polled_with.lock().len()
    }
}

#[async_trait::async_trait]
impl VideoBackend for ScriptedBackend {
    async fn submit(&self, request: &VideoRequest) -> Result<OperationHandle> {
        if let Some(e) = self.submit_error.lock().take() {
            return Err(e);
        }
        self.submitted.lock().push(request.clone());
        Ok(OperationHandle::new("op-0"))
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus> {
        let n = {
            let mut seen = self.polled_with.lock();
            seen.push(handle.name.clone());
            seen.len()
        };
        let next = OperationHandle::new(format!("op-{n}"));
        let step = self.script.lock().pop_front().unwrap_or(Poll::Pending);
        Ok(match step {
            Poll::Rejected(msg) => return Err(Error::Auth(msg.to_string())),
            Poll::Pending => OperationStatus {
                handle: next,
                done: false,
                video_uri: None,
                error: None,
            },
            Poll::Done(uri) => OperationStatus {
                handle: next,
                done: true,
                video_uri: uri.map(str::to_string),
                error: None,
            },
            Poll::Failed(msg) => OperationStatus {
                handle: next,
                done: true,
                video_uri: None,
                error: Some(msg.to_string()),
            },
        })
    }

    async fn fetch(&self, uri: &str) -> Result<VideoArtifact> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(VideoArtifact::new(vec![0, 0, 0, 24], "video/mp4", uri))
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }
}

struct CountingSelector {
    selected: AtomicBool,
    /// Whether opening the selector yields a key.
    supplies_key: bool,
    opened: AtomicUsize,
}

impl CountingSelector {
    fn new(selected: bool) -> Arc<Self> {
        Arc::new(Self {
            selected: AtomicBool::new(selected),
            supplies_key: true,
            opened: AtomicUsize::new(0),
        })
    }

    /// No key selected, and the user dismisses the prompt without one.
    fn dismissed() -> Arc<Self> {
        Arc::new(Self {
            selected: AtomicBool::new(false),
            supplies_key: false,
            opened: AtomicUsize::new(0),
        })
    }

    fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl KeySelector for CountingSelector {
    async fn has_selected_key(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    async fn open_select_key(&self) -> Result<()> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.supplies_key {
            self.selected.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

fn policy(max_attempts: Option<u32>) -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(5),
        max_attempts,
    }
}

fn image() -> InlineMedia {
    InlineMedia::new(vec![0x89, b'P', b'N', b'G'], "image/png")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Polling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(start_paused = true)]
async fn polls_until_done_then_fetches() {
    let backend = ScriptedBackend::pending_then_done(3);
    let synth = VideoSynthesizer::new(backend.clone(), policy(Some(10)));

    let artifact = synth.generate_video(image(), "disk full warning").await.unwrap();

    assert_eq!(backend.polls(), 4);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(artifact.mime_type, "video/mp4");
    assert_eq!(synth.state(), VideoJobState::Completed);
}

#[tokio::test(start_paused = true)]
async fn each_poll_uses_latest_handle() {
    let backend = ScriptedBackend::pending_then_done(4);
    let synth = VideoSynthesizer::new(backend.clone(), policy(None));

    synth.generate_video(image(), "blue screen").await.unwrap();

    let seen = backend.polled_with.lock().clone();
    assert_eq!(seen, vec!["op-0", "op-1", "op-2", "op-3", "op-4"]);
}

#[tokio::test(start_paused = true)]
async fn waits_one_interval_before_each_poll() {
    let backend = ScriptedBackend::pending_then_done(2);
    let synth = VideoSynthesizer::new(backend.clone(), policy(None));

    let started = tokio::time::Instant::now();
    synth.generate_video(image(), "router lights off").await.unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn submission_carries_template_and_fixed_parameters() {
    let backend = ScriptedBackend::pending_then_done(0);
    let synth = VideoSynthesizer::new(backend.clone(), policy(None));

    synth.generate_video(image(), "toner leak").await.unwrap();

    let submitted = backend.submitted.lock();
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        submitted[0].prompt,
        "Animate this scene showing: toner leak. Professional technical visualization style."
    );
    assert_eq!(submitted[0].image.mime_type, "image/png");
    assert_eq!(submitted[0].parameters.number_of_videos, 1);
    assert_eq!(submitted[0].parameters.resolution, "720p");
    assert_eq!(submitted[0].parameters.aspect_ratio, "16:9");
}

#[tokio::test(start_paused = true)]
async fn poll_cap_fails_with_timeout() {
    let backend = Arc::new(ScriptedBackend::default());
    let synth = VideoSynthesizer::new(backend.clone(), policy(Some(3)));

    let err = synth.generate_video(image(), "slow job").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(backend.polls(), 3);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(synth.state(), VideoJobState::Failed);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion without an artifact
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(start_paused = true)]
async fn done_without_video_is_provider_error_and_skips_fetch() {
    let backend = Arc::new(ScriptedBackend {
        script: Mutex::new(VecDeque::from([Poll::Pending, Poll::Done(None)])),
        ..ScriptedBackend::default()
    });
    let synth = VideoSynthesizer::new(backend.clone(), policy(Some(10)));

    let err = synth.generate_video(image(), "no artifact").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProviderError);
    assert!(err.to_string().contains("video generation failed"));
    assert_eq!(backend.polls(), 2);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn operation_error_is_reported_verbatim() {
    let backend = Arc::new(ScriptedBackend {
        script: Mutex::new(VecDeque::from([Poll::Failed("image rejected by safety filter")])),
        ..ScriptedBackend::default()
    });
    let synth = VideoSynthesizer::new(backend.clone(), policy(Some(10)));

    let err = synth.generate_video(image(), "x").await.unwrap_err();
    assert!(err.to_string().contains("image rejected by safety filter"));
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Key selection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(start_paused = true)]
async fn preflight_opens_selector_when_no_key() {
    let backend = ScriptedBackend::pending_then_done(0);
    let selector = CountingSelector::new(false);
    let synth = VideoSynthesizer::new(backend, policy(None)).with_selector(selector.clone());

    synth.generate_video(image(), "x").await.unwrap();
    assert_eq!(selector.opened(), 1);
}

#[tokio::test(start_paused = true)]
async fn preflight_skipped_when_key_selected() {
    let backend = ScriptedBackend::pending_then_done(2);
    let selector = CountingSelector::new(true);
    let synth = VideoSynthesizer::new(backend, policy(None)).with_selector(selector.clone());

    synth.generate_video(image(), "x").await.unwrap();
    assert_eq!(selector.opened(), 0);
}

#[tokio::test(start_paused = true)]
async fn entity_not_found_reopens_selector_once_and_returns_error() {
    let backend = Arc::new(ScriptedBackend::default());
    *backend.submit_error.lock() = Some(Error::provider(
        "scripted",
        format!("HTTP 404 - {ENTITY_NOT_FOUND}."),
    ));
    let selector = CountingSelector::new(true);
    let synth = VideoSynthesizer::new(backend.clone(), policy(Some(10)))
        .with_selector(selector.clone());

    let err = synth.generate_video(image(), "x").await.unwrap_err();

    assert!(err.is_credential_rejection());
    assert!(err.to_string().contains(ENTITY_NOT_FOUND));
    assert_eq!(selector.opened(), 1);
    assert_eq!(backend.polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn rejection_while_polling_reopens_selector_once() {
    let backend = Arc::new(ScriptedBackend {
        script: Mutex::new(VecDeque::from([
            Poll::Pending,
            Poll::Rejected("HTTP 403 - API key revoked"),
        ])),
        ..ScriptedBackend::default()
    });
    let selector = CountingSelector::new(true);
    let synth = VideoSynthesizer::new(backend.clone(), policy(Some(10)))
        .with_selector(selector.clone());

    let err = synth.generate_video(image(), "x").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthError);
    assert!(err.to_string().contains("API key revoked"));
    assert_eq!(selector.opened(), 1);
    assert_eq!(backend.polls(), 2);
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(synth.state(), VideoJobState::Failed);
}

#[tokio::test(start_paused = true)]
async fn rejection_without_selector_returns_error() {
    let backend = Arc::new(ScriptedBackend {
        script: Mutex::new(VecDeque::from([Poll::Rejected("HTTP 401 - unauthorized")])),
        ..ScriptedBackend::default()
    });
    let synth = VideoSynthesizer::new(backend.clone(), policy(Some(10)));

    let err = synth.generate_video(image(), "x").await.unwrap_err();

    assert!(err.is_credential_rejection());
    assert_eq!(backend.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(synth.state(), VideoJobState::Failed);
}

#[tokio::test(start_paused = true)]
async fn dismissed_preflight_prompt_is_not_reopened() {
    let backend = Arc::new(ScriptedBackend::default());
    *backend.submit_error.lock() = Some(Error::Auth("no API key selected".into()));
    let selector = CountingSelector::dismissed();
    let synth = VideoSynthesizer::new(backend.clone(), policy(Some(10)))
        .with_selector(selector.clone());

    let err = synth.generate_video(image(), "x").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthError);
    assert_eq!(selector.opened(), 1);
    assert_eq!(backend.polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn non_credential_failure_does_not_open_selector() {
    let backend = Arc::new(ScriptedBackend::default());
    *backend.submit_error.lock() = Some(Error::Http("connection reset".into()));
    let selector = CountingSelector::new(true);
    let synth = VideoSynthesizer::new(backend, policy(Some(10))).with_selector(selector.clone());

    let err = synth.generate_video(image(), "x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert_eq!(selector.opened(), 0);
}

#[tokio::test(start_paused = true)]
async fn blank_description_is_rejected_before_submit() {
    let backend = Arc::new(ScriptedBackend::default());
    let synth = VideoSynthesizer::new(backend.clone(), policy(None));

    let err = synth.generate_video(image(), "   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(backend.submitted.lock().is_empty());
    assert_eq!(synth.state(), VideoJobState::Idle);
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_polling_progress() {
    let backend = ScriptedBackend::pending_then_done(1);
    let synth = Arc::new(VideoSynthesizer::new(backend, policy(None)));
    let mut rx = synth.subscribe();

    let task = {
        let synth = synth.clone();
        tokio::spawn(async move { synth.generate_video(image(), "x").await })
    };

    let mut seen = Vec::new();
    while rx.changed().await.is_ok() {
        let state = *rx.borrow_and_update();
        seen.push(state);
        if state.is_terminal() {
            break;
        }
    }
    task.await.unwrap().unwrap();

    assert!(seen.contains(&VideoJobState::Polling { attempt: 1 }));
    assert_eq!(seen.last(), Some(&VideoJobState::Completed));
}
