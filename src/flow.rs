//! Upload flow: the one photo currently being previewed, named and saved
//!
//! `Empty -> Previewing -> Confirming -> (saved) -> Empty`, with `discard`
//! returning to `Empty` from either non-empty phase. Every transition
//! returns the [`Screen`] the display layer should show next.

use crate::care::CareInfo;
use crate::error::GalleryError;
use crate::gallery::GalleryStore;
use crate::models::{ChatTurn, ImageData, SavedEntry};
use chrono::Utc;
use log::{debug, info};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Empty,
    Previewing,
    Confirming,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Empty => "empty",
            Phase::Previewing => "previewing",
            Phase::Confirming => "confirming",
        };
        f.write_str(label)
    }
}

/// What the display layer should render after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    /// Nothing staged; show the file picker
    Upload,
    /// Show the staged image with save/discard controls
    Preview,
    /// Ask for a name to save under
    NamePrompt,
    /// Entry committed to the gallery
    Saved { name: String, replaced: bool },
}

/// The single unsaved upload. Reset to the default (`Empty`) on discard and
/// after a successful save.
#[derive(Debug, Default)]
pub struct PendingUpload {
    phase: Phase,
    staged: Option<ImageData>,
    draft_name: Option<String>,
    draft_chat_log: Vec<ChatTurn>,
    identification: Option<String>,
    care_info: Option<CareInfo>,
}

impl PendingUpload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn staged_image(&self) -> Option<&ImageData> {
        self.staged.as_ref()
    }

    pub fn draft_name(&self) -> Option<&str> {
        self.draft_name.as_deref()
    }

    pub fn draft_chat_log(&self) -> &[ChatTurn] {
        &self.draft_chat_log
    }

    pub fn identification(&self) -> Option<&str> {
        self.identification.as_deref()
    }

    pub fn care_info(&self) -> Option<&CareInfo> {
        self.care_info.as_ref()
    }

    /// The screen matching the current phase
    pub fn screen(&self) -> Screen {
        match self.phase {
            Phase::Empty => Screen::Upload,
            Phase::Previewing => Screen::Preview,
            Phase::Confirming => Screen::NamePrompt,
        }
    }

    pub fn stage_image(&mut self, image: ImageData) -> Result<Screen, GalleryError> {
        if self.phase != Phase::Empty {
            return Err(GalleryError::precondition("stage_image", self.phase));
        }
        if image.is_empty() {
            return Err(GalleryError::Validation("uploaded image is empty".to_string()));
        }

        info!("[flow] Staged {} bytes ({})", image.len(), image.media_type);
        *self = Self {
            phase: Phase::Previewing,
            staged: Some(image),
            ..Self::default()
        };
        Ok(Screen::Preview)
    }

    pub fn request_save(&mut self) -> Result<Screen, GalleryError> {
        if self.phase != Phase::Previewing {
            return Err(GalleryError::precondition("request_save", self.phase));
        }
        self.phase = Phase::Confirming;
        Ok(Screen::NamePrompt)
    }

    /// Stores a candidate name. Uniqueness is not checked; saving over an
    /// existing name replaces it.
    pub fn set_draft_name(&mut self, name: &str) -> Result<Screen, GalleryError> {
        if self.phase != Phase::Confirming {
            return Err(GalleryError::precondition("set_draft_name", self.phase));
        }
        self.draft_name = Some(name.trim().to_string());
        Ok(Screen::NamePrompt)
    }

    /// Records what the identifier and care lookup found for the staged
    /// image. A later call replaces the earlier result.
    pub fn attach_identification(
        &mut self,
        identification: Option<String>,
        care_info: Option<CareInfo>,
    ) -> Result<Screen, GalleryError> {
        if self.phase == Phase::Empty {
            return Err(GalleryError::precondition(
                "attach_identification",
                self.phase,
            ));
        }
        self.identification = identification;
        self.care_info = care_info;
        Ok(self.screen())
    }

    /// Appends a turn to the draft transcript. Identical consecutive turns
    /// are kept.
    pub fn append_chat_turn(&mut self, turn: ChatTurn) -> Result<Screen, GalleryError> {
        if self.phase == Phase::Empty {
            return Err(GalleryError::precondition("append_chat_turn", self.phase));
        }
        debug!("[flow] {}: {}", turn.speaker, turn.message);
        self.draft_chat_log.push(turn);
        Ok(self.screen())
    }

    /// Commits the staged image to `store` under the draft name and resets
    /// to `Empty`. On a validation failure the upload stays in `Confirming`.
    pub fn confirm_save(&mut self, store: &mut GalleryStore) -> Result<Screen, GalleryError> {
        if self.phase != Phase::Confirming {
            return Err(GalleryError::precondition("confirm_save", self.phase));
        }
        let has_name = self.draft_name.as_deref().is_some_and(|n| !n.is_empty());
        if !has_name {
            return Err(GalleryError::Validation(
                "a name is required to save this photo".to_string(),
            ));
        }

        let pending = std::mem::take(self);
        let (Some(name), Some(image)) = (pending.draft_name, pending.staged) else {
            // Confirming is only reachable with a staged image
            return Err(GalleryError::precondition("confirm_save", Phase::Empty));
        };

        let entry = SavedEntry {
            name: name.clone(),
            image,
            identification: pending.identification,
            care_info: pending.care_info,
            chat_log: pending.draft_chat_log,
            saved_at: Utc::now(),
        };
        let replaced = store.put(name.clone(), entry).is_some();
        info!(
            "[flow] Saved photo as '{}'{}",
            name,
            if replaced { " (replaced existing)" } else { "" }
        );
        Ok(Screen::Saved { name, replaced })
    }

    /// Drops the staged image and draft state. Safe to call when empty.
    pub fn discard(&mut self) -> Screen {
        if self.phase != Phase::Empty {
            info!("[flow] Discarded staged upload");
        }
        *self = Self::default();
        Screen::Upload
    }
}
