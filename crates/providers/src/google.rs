//! Google Gemini / Veo adapter.
//!
//! Implements `generateContent` for chat replies and audio transcription,
//! and the `predictLongRunning` + operation-status endpoints for
//! image-to-video generation. Auth is via an API key passed as a query
//! parameter (`key={api_key}`), read from the shared [`KeyStore`] on every
//! request.

use std::sync::Arc;
use std::time::Instant;

use base64::Engine as _;
use nb_domain::config::Config;
use nb_domain::error::{Error, Result};
use nb_domain::media::{InlineMedia, VideoArtifact};
use nb_domain::trace::TraceEvent;
use nb_domain::turn::{ConversationTurn, Role};
use serde_json::Value;

use crate::auth::KeyStore;
use crate::traits::{AiGateway, OperationHandle, OperationStatus, VideoBackend, VideoRequest};
use crate::util::{from_reqwest, redact_url_key, status_error, with_key_param};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Provider adapter for the Google generative-AI API.
pub struct GoogleProvider {
    id: String,
    base_url: String,
    keys: Arc<KeyStore>,
    chat_model: String,
    video_model: String,
    system_instruction: String,
    transcription_instruction: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    /// Create a new provider from the deserialized config.
    pub fn from_config(cfg: &Config, keys: Arc<KeyStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(cfg.llm.request_timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.llm.provider_id.clone(),
            base_url: cfg.llm.base_url.trim_end_matches('/').to_string(),
            keys,
            chat_model: cfg.llm.chat_model.clone(),
            video_model: cfg.video.model.clone(),
            system_instruction: cfg.llm.system_instruction.clone(),
            transcription_instruction: cfg.assistant.transcription_instruction.clone(),
            client,
        })
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn generate_url(&self, model: &str, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, api_key
        )
    }

    fn long_running_url(&self, model: &str, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:predictLongRunning?key={}",
            self.base_url, model, api_key
        )
    }

    fn operation_url(&self, name: &str, api_key: &str) -> String {
        format!(
            "{}/v1beta/{}?key={}",
            self.base_url,
            name.trim_start_matches('/'),
            api_key
        )
    }

    fn build_chat_body(&self, transcript: &[ConversationTurn]) -> Value {
        let contents: Vec<Value> = transcript.iter().map(turn_to_gemini).collect();
        let mut body = serde_json::json!({ "contents": contents });
        if !self.system_instruction.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{"text": self.system_instruction}]
            });
        }
        body
    }

    fn build_transcription_body(&self, audio: &InlineMedia) -> Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"text": self.transcription_instruction},
                    inline_data(audio),
                ]
            }]
        })
    }

    /// POST a JSON body and return the parsed response, classifying
    /// failures into transport, credential and provider errors.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        tracing::debug!(provider = %self.id, url = %redact_url_key(url), "google request");

        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(from_reqwest)?;

        self.read_json(resp).await
    }

    async fn read_json(&self, resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(status_error(&self.id, status, &resp_text));
        }

        serde_json::from_str(&resp_text).map_err(|e| {
            Error::provider(&self.id, format!("malformed response body: {e}"))
        })
    }

    async fn generate_text(&self, operation: &str, body: Value) -> Result<String> {
        let key = self.keys.current()?;
        let url = self.generate_url(&self.chat_model, &key);
        let started = Instant::now();

        let result = self
            .post_json(&url, &body)
            .await
            .and_then(|v| parse_candidate_text(&v, &self.id));

        TraceEvent::LlmRequest {
            provider: self.id.clone(),
            model: self.chat_model.clone(),
            operation: operation.into(),
            duration_ms: started.elapsed().as_millis() as u64,
            ok: result.is_ok(),
        }
        .emit();

        result
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message serialization helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn turn_to_gemini(turn: &ConversationTurn) -> Value {
    let role = match turn.role {
        Role::User => "user",
        Role::Assistant => "model",
    };
    serde_json::json!({
        "role": role,
        "parts": [{"text": turn.text}],
    })
}

fn inline_data(media: &InlineMedia) -> Value {
    serde_json::json!({
        "inlineData": {
            "mimeType": media.mime_type,
            "data": base64::engine::general_purpose::STANDARD.encode(&media.bytes),
        }
    })
}

fn build_video_body(req: &VideoRequest) -> Value {
    serde_json::json!({
        "instances": [{
            "prompt": req.prompt,
            "image": {
                "bytesBase64Encoded": base64::engine::general_purpose::STANDARD.encode(&req.image.bytes),
                "mimeType": req.image.mime_type,
            }
        }],
        "parameters": {
            "sampleCount": req.parameters.number_of_videos,
            "resolution": req.parameters.resolution,
            "aspectRatio": req.parameters.aspect_ratio,
        }
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_candidate_text(body: &Value, provider: &str) -> Result<String> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::provider(provider, "no candidates in response"))?;

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate
            .get("finishReason")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        return Err(Error::provider(
            provider,
            format!("empty response (finishReason: {reason})"),
        ));
    }

    Ok(text)
}

/// Parse an operation resource. `previous` is kept when the provider omits
/// the name in its reply.
fn parse_operation(body: &Value, previous: &OperationHandle) -> OperationStatus {
    let handle = body
        .get("name")
        .and_then(|n| n.as_str())
        .map(OperationHandle::new)
        .unwrap_or_else(|| previous.clone());

    let done = body.get("done").and_then(|d| d.as_bool()).unwrap_or(false);

    let error = body.get("error").map(|e| {
        e.get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| e.to_string())
    });

    let response = body.get("response");
    // REST shape first, then the SDK-style shape.
    let video_uri = response
        .and_then(|r| r.pointer("/generateVideoResponse/generatedSamples/0/video/uri"))
        .or_else(|| response.and_then(|r| r.pointer("/generatedVideos/0/video/uri")))
        .and_then(|u| u.as_str())
        .map(str::to_string);

    OperationStatus {
        handle,
        done,
        video_uri,
        error,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementations
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl AiGateway for GoogleProvider {
    async fn generate_reply(&self, transcript: &[ConversationTurn]) -> Result<String> {
        if transcript.is_empty() {
            return Err(Error::InvalidInput("transcript is empty".into()));
        }
        let body = self.build_chat_body(transcript);
        self.generate_text("chat", body).await
    }

    async fn transcribe_audio(&self, audio: &InlineMedia) -> Result<String> {
        if audio.is_empty() {
            return Err(Error::InvalidInput("audio clip is empty".into()));
        }
        let body = self.build_transcription_body(audio);
        self.generate_text("transcribe", body).await
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}

#[async_trait::async_trait]
impl VideoBackend for GoogleProvider {
    async fn submit(&self, request: &VideoRequest) -> Result<OperationHandle> {
        let key = self.keys.current()?;
        let url = self.long_running_url(&self.video_model, &key);
        let body = build_video_body(request);

        let resp = self.post_json(&url, &body).await?;
        let name = resp
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| Error::provider(&self.id, "missing operation name in response"))?;

        tracing::info!(provider = %self.id, operation = %name, "video operation submitted");
        Ok(OperationHandle::new(name))
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus> {
        let key = self.keys.current()?;
        let url = self.operation_url(&handle.name, &key);

        tracing::debug!(provider = %self.id, url = %redact_url_key(&url), "video operation status");

        let resp = self.client.get(&url).send().await.map_err(from_reqwest)?;
        let body = self.read_json(resp).await?;
        Ok(parse_operation(&body, handle))
    }

    async fn fetch(&self, uri: &str) -> Result<VideoArtifact> {
        let key = self.keys.current()?;
        let url = with_key_param(uri, &key);

        tracing::debug!(provider = %self.id, url = %redact_url_key(&url), "video download");

        let resp = self.client.get(&url).send().await.map_err(from_reqwest)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http(format!(
                "HTTP {} downloading generated video",
                status.as_u16()
            )));
        }

        let mime_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("video/"))
            .unwrap_or_else(|| "video/mp4".into());

        let bytes = resp.bytes().await.map_err(from_reqwest)?;
        Ok(VideoArtifact::new(bytes.to_vec(), mime_type, uri))
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
