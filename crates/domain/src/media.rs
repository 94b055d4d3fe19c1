//! Binary payloads exchanged with the provider.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Raw bytes plus their declared MIME type (source images, audio clips).
#[derive(Clone, PartialEq, Eq)]
pub struct InlineMedia {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl InlineMedia {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read a file and infer its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mime_type = mime_for_path(path).ok_or_else(|| {
            Error::InvalidInput(format!(
                "unsupported media type for '{}'",
                path.display()
            ))
        })?;
        let bytes = std::fs::read(path)?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Keep payload bytes out of logs.
impl std::fmt::Debug for InlineMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineMedia")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Map a file extension to the MIME type the provider expects.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "webm" => "audio/webm",
        "ogg" | "oga" => "audio/ogg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}

/// A generated video that has been downloaded and is ready for playback.
#[derive(Clone, Serialize, Deserialize)]
pub struct VideoArtifact {
    /// Opaque local handle for this artifact.
    pub id: Uuid,
    pub mime_type: String,
    /// Provider URI the bytes were fetched from (without credentials).
    pub source_uri: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl VideoArtifact {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, source_uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mime_type: mime_type.into(),
            source_uri: source_uri.into(),
            bytes,
        }
    }

    /// Suggested file name, e.g. `<uuid>.mp4`.
    pub fn file_name(&self) -> String {
        let ext = match self.mime_type.as_str() {
            "video/webm" => "webm",
            "video/quicktime" => "mov",
            _ => "mp4",
        };
        format!("{}.{ext}", self.id)
    }
}

impl std::fmt::Debug for VideoArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoArtifact")
            .field("id", &self.id)
            .field("mime_type", &self.mime_type)
            .field("source_uri", &self.source_uri)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_inference_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("shot.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("a/b/c.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("note.webm")), Some("audio/webm"));
        assert_eq!(mime_for_path(Path::new("README")), None);
        assert_eq!(mime_for_path(Path::new("archive.tar.gz")), None);
    }

    #[test]
    fn unknown_extension_is_invalid_input() {
        let err = InlineMedia::from_path(Path::new("/nonexistent/file.xyz")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn debug_omits_bytes() {
        let media = InlineMedia::new(vec![1, 2, 3, 4], "image/png");
        let dbg = format!("{media:?}");
        assert!(dbg.contains("len: 4"));
        assert!(!dbg.contains("[1, 2, 3, 4]"));
    }

    #[test]
    fn artifact_file_name_uses_mime_extension() {
        let a = VideoArtifact::new(vec![0], "video/mp4", "https://x/v");
        assert!(a.file_name().ends_with(".mp4"));
        let b = VideoArtifact::new(vec![0], "video/webm", "https://x/v");
        assert!(b.file_name().ends_with(".webm"));
    }
}
