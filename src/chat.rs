//! Chat responders for talking to a photographed plant

use crate::config::AppConfig;
use crate::models::ChatTurn;
use crate::prompts::{CANNED_REPLY, FALLBACK_REPLY};
use async_trait::async_trait;
use log::{info, warn};
use serde_json::{json, Value};

/// Everything a responder gets for one reply
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_prompt: &'a str,
    pub prior_turns: &'a [ChatTurn],
    /// Speaker label used for the person; every other speaker is the plant
    pub user_speaker: &'a str,
    pub message: &'a str,
}

#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Always returns text; failures become a fallback reply
    async fn respond(&self, request: ChatRequest<'_>) -> String;
}

/// Offline responder with a fixed reply
#[derive(Debug, Clone)]
pub struct CannedResponder {
    reply: String,
}

impl CannedResponder {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new(CANNED_REPLY)
    }
}

#[async_trait]
impl ChatResponder for CannedResponder {
    async fn respond(&self, _request: ChatRequest<'_>) -> String {
        self.reply.clone()
    }
}

const OPENROUTER_REFERER: &str = "https://plantgallery.app";
const OPENROUTER_TITLE: &str = "Plant Gallery";

/// OpenRouter chat-completions client
#[derive(Debug, Clone)]
pub struct OpenRouterResponder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenRouterResponder {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 300,
        }
    }

    /// Builds a client from config, or `None` when no API key is set
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Option<Self> {
        let api_key = config.openrouter_api_key.clone()?;
        Some(Self::new(
            client,
            config.openrouter_base_url.clone(),
            api_key,
            config.chat_model.clone(),
        ))
    }

    async fn complete(&self, messages: Vec<Value>) -> Result<String, String> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens
        });

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", OPENROUTER_REFERER)
            .header("X-Title", OPENROUTER_TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("API request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("API error: {} - {}", status, error_text));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        reply_content(&response_json).ok_or_else(|| "Response had no message content".to_string())
    }
}

#[async_trait]
impl ChatResponder for OpenRouterResponder {
    async fn respond(&self, request: ChatRequest<'_>) -> String {
        match self.complete(build_messages(&request)).await {
            Ok(reply) => {
                info!("[chat] Reply received: {} chars", reply.len());
                reply
            }
            Err(e) => {
                warn!("[chat] {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

/// System prompt, prior turns mapped to user/assistant roles, then the new
/// user message
pub fn build_messages(request: &ChatRequest<'_>) -> Vec<Value> {
    let mut messages = vec![json!({
        "role": "system",
        "content": request.system_prompt
    })];

    for turn in request.prior_turns {
        let role = if turn.speaker == request.user_speaker {
            "user"
        } else {
            "assistant"
        };
        messages.push(json!({
            "role": role,
            "content": turn.message
        }));
    }

    messages.push(json!({
        "role": "user",
        "content": request.message
    }));
    messages
}

fn reply_content(response: &Value) -> Option<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(prior: &'a [ChatTurn], message: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            system_prompt: "You are basil.",
            prior_turns: prior,
            user_speaker: "You",
            message,
        }
    }

    #[test]
    fn messages_map_speakers_to_roles() {
        let prior = vec![ChatTurn::new("You", "hi"), ChatTurn::new("Plant", "hello")];
        let messages = build_messages(&request(&prior, "how much water?"));

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are basil.");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[2]["content"], "hello");
        assert_eq!(messages[3]["role"], "user");
        assert_eq!(messages[3]["content"], "how much water?");
    }

    #[test]
    fn reply_content_reads_first_choice() {
        let body = json!({ "choices": [{ "message": { "content": " Water me weekly. " } }] });
        assert_eq!(reply_content(&body).as_deref(), Some("Water me weekly."));
        assert_eq!(reply_content(&json!({ "choices": [] })), None);
    }

    #[tokio::test]
    async fn canned_responder_ignores_input() {
        let reply = CannedResponder::new("leafy hello")
            .respond(request(&[], "anything"))
            .await;
        assert_eq!(reply, "leafy hello");
    }

    #[tokio::test]
    async fn unreachable_service_falls_back() {
        let responder =
            OpenRouterResponder::new(reqwest::Client::new(), "http://127.0.0.1:9", "key", "model");
        let reply = responder.respond(request(&[], "hi")).await;
        assert_eq!(reply, FALLBACK_REPLY);
    }
}
