//! Plant identification collaborators
//!
//! An identifier never fails hard: transport errors, non-success statuses
//! and empty match sets all come back as `None`.

use crate::config::AppConfig;
use crate::models::ImageData;
use async_trait::async_trait;
use log::{info, warn};
use serde_json::Value;

#[async_trait]
pub trait Identifier: Send + Sync {
    /// Best-matching scientific name for the image, if any
    async fn identify(&self, image: &ImageData) -> Option<String>;
}

/// Used when no identification service is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIdentifier;

#[async_trait]
impl Identifier for NoIdentifier {
    async fn identify(&self, _image: &ImageData) -> Option<String> {
        None
    }
}

/// Pl@ntNet `identify` endpoint client
#[derive(Debug, Clone)]
pub struct PlantNetIdentifier {
    client: reqwest::Client,
    base_url: String,
    project: String,
    api_key: String,
}

impl PlantNetIdentifier {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        project: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            project: project.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds a client from config, or `None` when no API key is set
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Option<Self> {
        let api_key = config.plantnet_api_key.clone()?;
        Some(Self::new(
            client,
            config.plantnet_base_url.clone(),
            config.plantnet_project.clone(),
            api_key,
        ))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v2/identify/{}",
            self.base_url.trim_end_matches('/'),
            self.project
        )
    }

    async fn request(&self, image: &ImageData) -> Result<Value, String> {
        let file_name = image
            .file_name
            .clone()
            .unwrap_or_else(|| "upload".to_string());
        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(file_name)
            .mime_str(&image.media_type)
            .map_err(|e| format!("Failed to create multipart: {}", e))?;
        let form = reqwest::multipart::Form::new()
            .part("images", part)
            .text("organs", "auto");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("api-key", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Identification request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error: {} - {}", status, body));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    }
}

#[async_trait]
impl Identifier for PlantNetIdentifier {
    async fn identify(&self, image: &ImageData) -> Option<String> {
        match self.request(image).await {
            Ok(body) => {
                let species = best_match(&body);
                match &species {
                    Some(name) => info!("[identify] Best match: {}", name),
                    None => info!("[identify] No species matched"),
                }
                species
            }
            Err(e) => {
                warn!("[identify] {}", e);
                None
            }
        }
    }
}

/// First result's scientific name from a Pl@ntNet response body
pub fn best_match(body: &Value) -> Option<String> {
    body["results"][0]["species"]["scientificNameWithoutAuthor"]
        .as_str()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
