//! Groq's OpenAI-compatible chat completions endpoint.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::AuthStorage;

use super::{Completion, LanguageModel, Prompt, Provider, TokenUsage};

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const TEMPERATURE: f32 = 0.2;

pub struct GroqModel {
    model: String,
    auth: AuthStorage,
    client: reqwest::Client,
}

impl GroqModel {
    pub fn new(model: Option<String>, auth: AuthStorage) -> Self {
        Self {
            model: model.unwrap_or_else(|| Provider::Groq.default_model().to_string()),
            auth,
            client: reqwest::Client::new(),
        }
    }

    fn build_request<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &prompt.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });
        ChatRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        }
    }

    fn first_choice(resp: ChatResponse) -> Option<String> {
        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

#[async_trait]
impl LanguageModel for GroqModel {
    fn provider(&self) -> &str {
        Provider::Groq.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<Completion> {
        let api_key = self.auth.api_key(Provider::Groq)?.ok_or_else(|| {
            anyhow!("no Groq credentials found. Run `costlens login groq` or set GROQ_API_KEY.")
        })?;

        let resp = self
            .client
            .post(API_URL)
            .bearer_auth(&api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Groq API error ({}): {}", status, text);
        }

        let chat: ChatResponse = resp.json().await?;
        let usage = chat.usage.as_ref().map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });
        let text = Self::first_choice(chat).ok_or_else(|| anyhow!("Groq API returned empty response"))?;

        if let Some(u) = usage {
            debug!(input = u.input_tokens, output = u.output_tokens, "groq token usage");
        }

        Ok(Completion { text, usage })
    }
}

// --- API types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> GroqModel {
        GroqModel::new(None, AuthStorage::open(":memory:").unwrap())
    }

    #[test]
    fn defaults_to_llama() {
        assert_eq!(model().model(), "llama-3.3-70b-versatile");
        assert_eq!(model().provider(), "groq");
    }

    #[test]
    fn request_has_system_then_user() {
        let m = model();
        let prompt = Prompt {
            system: Some("be terse".to_string()),
            user: "forecast".to_string(),
        };
        let body = serde_json::to_value(m.build_request(&prompt)).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "forecast");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn request_without_system_has_one_message() {
        let m = model();
        let prompt = Prompt {
            system: None,
            user: "x".to_string(),
        };
        let body = serde_json::to_value(m.build_request(&prompt)).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn parses_first_choice() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "{\"ok\":true}"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
            }"#,
        )
        .unwrap();
        assert_eq!(resp.usage.as_ref().unwrap().prompt_tokens, 12);
        assert_eq!(GroqModel::first_choice(resp).unwrap(), "{\"ok\":true}");
    }

    #[test]
    fn blank_choice_is_none() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "  "}}]}"#).unwrap();
        assert!(GroqModel::first_choice(resp).is_none());
    }
}
