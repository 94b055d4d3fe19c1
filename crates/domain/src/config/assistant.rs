use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Assistant behaviour
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// User-facing strings for the chat assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Assistant turn that opens every new conversation. Empty disables it.
    #[serde(default = "d_greeting")]
    pub greeting: String,
    /// Shown when the provider answers with no text.
    #[serde(default = "d_empty_reply")]
    pub empty_reply_fallback: String,
    /// Shown when the provider call fails.
    #[serde(default = "d_error_reply")]
    pub error_reply_fallback: String,
    /// Instruction sent alongside audio for transcription.
    #[serde(default = "d_transcription")]
    pub transcription_instruction: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: d_greeting(),
            empty_reply_fallback: d_empty_reply(),
            error_reply_fallback: d_error_reply(),
            transcription_instruction: d_transcription(),
        }
    }
}

fn d_greeting() -> String {
    "¡Hola! Soy tu asistente NeuroBOT. ¿En qué puedo ayudarte hoy?".into()
}
fn d_empty_reply() -> String {
    "No pude procesar tu solicitud.".into()
}
fn d_error_reply() -> String {
    "Lo siento, hubo un problema técnico con mi conexión.".into()
}
fn d_transcription() -> String {
    "Transcribe this audio verbatim. Respond with the transcription only.".into()
}
