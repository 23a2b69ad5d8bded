//! The single upstream call every task funnels through.

pub mod anthropic;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;

/// Turns a prompt into generated text. Could be a hosted LLM or a test script.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
