pub mod anthropic;
pub mod groq;
pub mod mock;

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::auth::AuthStorage;

/// Token usage from a single LLM call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Accumulate another usage into this one.
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }

    /// Total tokens (input + output).
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// A rendered prompt: optional system instructions plus the user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

/// Raw text returned by the model.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// A remote text model. Forecasts and anomaly reports come from here.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name, e.g. `"groq"`.
    fn provider(&self) -> &str;

    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &Prompt) -> Result<Completion>;
}

/// Providers selectable from the command line or config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Groq,
    Anthropic,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Environment variable consulted when no key is stored.
    pub fn env_var(self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Groq => crate::consts::DEFAULT_GROQ_MODEL,
            Provider::Anthropic => crate::consts::DEFAULT_ANTHROPIC_MODEL,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            "anthropic" => Ok(Provider::Anthropic),
            other => bail!("unknown provider: {other} (expected groq or anthropic)"),
        }
    }
}

/// Build the client for a provider.
pub fn build(provider: Provider, model: Option<String>, auth: AuthStorage) -> Box<dyn LanguageModel> {
    match provider {
        Provider::Groq => Box::new(groq::GroqModel::new(model, auth)),
        Provider::Anthropic => Box::new(anthropic::AnthropicModel::new(model, auth)),
    }
}

/// Extract JSON from text that may be wrapped in markdown code fences
/// or surrounded by prose.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(after) = trimmed.strip_prefix("```json")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }
    if let Some(after) = trimmed.strip_prefix("```")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }

    if !trimmed.starts_with('{')
        && let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
    {
        return &trimmed[start..=end];
    }

    trimmed
}
