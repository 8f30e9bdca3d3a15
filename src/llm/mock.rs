use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::{Completion, LanguageModel, Prompt, TokenUsage};

/// A scripted model for tests. Returns pre-defined replies in order and
/// records every prompt it was sent.
pub struct MockModel {
    replies: Vec<Result<String, String>>,
    index: AtomicUsize,
    prompts: Mutex<Vec<Prompt>>,
}

impl MockModel {
    pub fn new(replies: Vec<String>) -> Self {
        Self::scripted(replies.into_iter().map(Ok).collect())
    }

    /// Replies where `Err(msg)` makes the call fail with `msg`.
    pub fn scripted(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<Completion> {
        self.prompts.lock().unwrap().push(prompt.clone());
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .get(i)
            .ok_or_else(|| anyhow!("MockModel: no more replies (called {} times)", i + 1))?;
        match reply {
            Ok(text) => Ok(Completion {
                text: text.clone(),
                usage: Some(TokenUsage {
                    input_tokens: prompt.user.len() as u64,
                    output_tokens: text.len() as u64,
                }),
            }),
            Err(msg) => Err(anyhow!("{msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(user: &str) -> Prompt {
        Prompt {
            system: None,
            user: user.to_string(),
        }
    }

    #[tokio::test]
    async fn replies_in_order_then_errors() {
        let model = MockModel::new(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(model.complete(&prompt("a")).await.unwrap().text, "one");
        assert_eq!(model.complete(&prompt("b")).await.unwrap().text, "two");
        assert!(model.complete(&prompt("c")).await.is_err());
        assert_eq!(model.prompts().len(), 3);
    }

    #[tokio::test]
    async fn scripted_error() {
        let model = MockModel::scripted(vec![Err("boom".to_string())]);
        let err = model.complete(&prompt("a")).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
