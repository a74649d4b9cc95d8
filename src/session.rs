//! The interaction context: one pending upload, the gallery, and the
//! collaborators that fill in identification, care info and chat replies.

use crate::care::CareCatalog;
use crate::chat::{CannedResponder, ChatRequest, ChatResponder, OpenRouterResponder};
use crate::config::AppConfig;
use crate::error::{ConfigError, GalleryError};
use crate::flow::{PendingUpload, Screen};
use crate::gallery::GalleryStore;
use crate::identify::{Identifier, NoIdentifier, PlantNetIdentifier};
use crate::media::{self, ViewerDetails};
use crate::models::{ChatTurn, ImageData, SavedEntry};
use crate::prompts::plant_system_prompt;
use log::{info, warn};

/// Result of running identification on the staged image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub species: Option<String>,
    pub care_found: bool,
}

pub struct Session {
    pending: PendingUpload,
    gallery: GalleryStore,
    identifier: Box<dyn Identifier>,
    catalog: CareCatalog,
    responder: Box<dyn ChatResponder>,
    user_speaker: String,
    plant_speaker: String,
}

impl Session {
    pub fn new(
        identifier: Box<dyn Identifier>,
        catalog: CareCatalog,
        responder: Box<dyn ChatResponder>,
    ) -> Self {
        Self {
            pending: PendingUpload::new(),
            gallery: GalleryStore::new(),
            identifier,
            catalog,
            responder,
            user_speaker: "You".to_string(),
            plant_speaker: "Plant".to_string(),
        }
    }

    /// Wires up collaborators from config. Services without an API key are
    /// replaced by their offline stand-ins.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let client = config.http_client()?;

        let identifier: Box<dyn Identifier> =
            match PlantNetIdentifier::from_config(config, client.clone()) {
                Some(plantnet) => Box::new(plantnet),
                None => {
                    warn!("[session] No Pl@ntNet API key; identification disabled");
                    Box::new(NoIdentifier)
                }
            };

        let responder: Box<dyn ChatResponder> =
            match OpenRouterResponder::from_config(config, client) {
                Some(openrouter) => Box::new(openrouter),
                None => {
                    info!("[session] No OpenRouter API key; using canned replies");
                    Box::new(CannedResponder::default())
                }
            };

        let catalog = CareCatalog::load(&config.care_data_path()?)?;

        Ok(Self::new(identifier, catalog, responder)
            .with_speakers(&config.user_speaker, &config.plant_speaker))
    }

    pub fn with_speakers(mut self, user: &str, plant: &str) -> Self {
        self.user_speaker = user.to_string();
        self.plant_speaker = plant.to_string();
        self
    }

    pub fn pending(&self) -> &PendingUpload {
        &self.pending
    }

    pub fn gallery(&self) -> &GalleryStore {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut GalleryStore {
        &mut self.gallery
    }

    pub fn screen(&self) -> Screen {
        self.pending.screen()
    }

    /// Stages an upload, detecting its media type
    pub fn upload(
        &mut self,
        bytes: Vec<u8>,
        file_name: Option<&str>,
    ) -> Result<Screen, GalleryError> {
        self.pending.stage_image(ImageData::from_upload(bytes, file_name))
    }

    pub fn stage_image(&mut self, image: ImageData) -> Result<Screen, GalleryError> {
        self.pending.stage_image(image)
    }

    /// Identifies the staged image and looks up its care info. A failed
    /// identification leaves both absent; the photo can still be saved.
    pub async fn analyze(&mut self) -> Result<Analysis, GalleryError> {
        let Some(image) = self.pending.staged_image() else {
            return Err(GalleryError::precondition("analyze", self.pending.phase()));
        };

        let species = self.identifier.identify(image).await;
        let care_info = species
            .as_deref()
            .and_then(|name| self.catalog.lookup(name).ok())
            .cloned();

        let analysis = Analysis {
            species: species.clone(),
            care_found: care_info.is_some(),
        };
        self.pending.attach_identification(species, care_info)?;
        Ok(analysis)
    }

    /// Sends a message to the plant and records both turns. Returns the reply.
    pub async fn chat(&mut self, message: &str) -> Result<String, GalleryError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(GalleryError::Validation("message is empty".to_string()));
        }
        if self.pending.staged_image().is_none() {
            return Err(GalleryError::precondition("chat", self.pending.phase()));
        }

        let system_prompt = {
            let personality = self.pending.care_info().map(|care| &care.personality);
            plant_system_prompt(
                personality.and_then(|p| p.prompt.as_deref()),
                personality.map(|p| p.traits.as_slice()).unwrap_or(&[]),
            )
        };
        let prior_turns = self.pending.draft_chat_log().to_vec();

        self.pending
            .append_chat_turn(ChatTurn::new(self.user_speaker.as_str(), message))?;

        let reply = self
            .responder
            .respond(ChatRequest {
                system_prompt: &system_prompt,
                prior_turns: &prior_turns,
                user_speaker: &self.user_speaker,
                message,
            })
            .await;

        self.pending
            .append_chat_turn(ChatTurn::new(self.plant_speaker.as_str(), reply.as_str()))?;
        Ok(reply)
    }

    pub fn append_chat_turn(&mut self, turn: ChatTurn) -> Result<Screen, GalleryError> {
        self.pending.append_chat_turn(turn)
    }

    pub fn request_save(&mut self) -> Result<Screen, GalleryError> {
        self.pending.request_save()
    }

    pub fn set_draft_name(&mut self, name: &str) -> Result<Screen, GalleryError> {
        self.pending.set_draft_name(name)
    }

    pub fn confirm_save(&mut self) -> Result<Screen, GalleryError> {
        self.pending.confirm_save(&mut self.gallery)
    }

    pub fn discard(&mut self) -> Screen {
        self.pending.discard()
    }

    pub fn get(&self, name: &str) -> Result<&SavedEntry, GalleryError> {
        self.gallery.get(name)
    }

    /// Stand-alone HTML page for one saved entry
    pub fn viewer_html(&self, name: &str) -> Result<String, GalleryError> {
        let entry = self.gallery.get(name)?;
        let details = ViewerDetails {
            identification: entry.identification.as_deref(),
            care_lines: entry
                .care_info
                .as_ref()
                .map(|care| care.care_lines())
                .unwrap_or_default(),
        };
        Ok(media::viewer_html(
            &entry.name,
            &entry.image.data_url(),
            &details,
        ))
    }

    /// The viewer page as a `data:text/html` URL, for opening in a new tab
    pub fn viewer_url(&self, name: &str) -> Result<String, GalleryError> {
        self.viewer_html(name).map(|html| media::html_data_url(&html))
    }
}
