//! Data models and structures used throughout the application

use crate::care::CareInfo;
use crate::media;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded image: the original bytes plus their declared media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub file_name: Option<String>,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            file_name: None,
        }
    }

    /// Builds image data from an upload, detecting the media type from the
    /// bytes first and the file name second.
    pub fn from_upload(bytes: Vec<u8>, file_name: Option<&str>) -> Self {
        let media_type = media::detect_media_type(&bytes, file_name);
        Self {
            bytes,
            media_type,
            file_name: file_name.map(str::to_string),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Inline-display form: `data:<media type>;base64,<payload>`
    pub fn data_url(&self) -> String {
        media::data_url(&self.media_type, &self.bytes)
    }

    /// Width and height read from the image header, if it decodes
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        media::image_dimensions(&self.bytes)
    }
}

/// One (speaker, message) pair in a conversation transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: String,
    pub message: String,
}

impl ChatTurn {
    pub fn new(speaker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            message: message.into(),
        }
    }
}

impl<S: Into<String>, M: Into<String>> From<(S, M)> for ChatTurn {
    fn from((speaker, message): (S, M)) -> Self {
        Self::new(speaker, message)
    }
}

/// A photo saved into the gallery under a user-chosen name
#[derive(Debug, Clone)]
pub struct SavedEntry {
    pub name: String,
    pub image: ImageData,
    pub identification: Option<String>,
    pub care_info: Option<CareInfo>,
    pub chat_log: Vec<ChatTurn>,
    pub saved_at: DateTime<Utc>,
}

impl SavedEntry {
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            name: self.name.clone(),
            media_type: self.image.media_type.clone(),
            size_bytes: self.image.len(),
            identification: self.identification.clone(),
            care_title: self
                .care_info
                .as_ref()
                .and_then(|care| care.personality.title.clone()),
            chat_turns: self.chat_log.len(),
            saved_at: self.saved_at,
        }
    }
}

/// Serializable listing view of a saved entry
#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub name: String,
    pub media_type: String,
    pub size_bytes: usize,
    pub identification: Option<String>,
    pub care_title: Option<String>,
    pub chat_turns: usize,
    pub saved_at: DateTime<Utc>,
}
