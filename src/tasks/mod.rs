//! Prompt-template tasks bound to a completion client.
//!
//! A [`Task`] renders its instruction template around the user's input and
//! hands the result to a [`Completion`]. [`TaskFactory`] owns one client and
//! stamps out tasks that share it.

pub mod email;
pub mod translator;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::completion::Completion;
use crate::completion::anthropic::AnthropicClient;
use crate::config::CompletionConfig;

pub use email::EmailComposer;
pub use translator::Translator;

/// Free-form per-call options. Unknown keys are ignored.
pub type TaskOptions = HashMap<String, String>;

/// Option key for the translator's target language.
pub const TARGET_LANGUAGE: &str = "target_language";

/// A templated transformation of input text through one completion.
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self, input: &str, options: &TaskOptions) -> Result<String>;
}

/// The task variants the factory knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Translate,
    Email,
}

impl TaskKind {
    pub const ALL: &[TaskKind] = &[TaskKind::Translate, TaskKind::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Translate => "translate",
            TaskKind::Email => "email",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<_> = TaskKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown task: {s} (expected one of: {})", known.join(", "))
            })
    }
}

/// Builds tasks that all share one completion client.
#[derive(Clone)]
pub struct TaskFactory {
    client: Arc<dyn Completion>,
}

impl TaskFactory {
    pub fn new(client: Arc<dyn Completion>) -> Self {
        Self { client }
    }

    /// Build a factory backed by a fresh Anthropic client.
    pub fn from_config(config: CompletionConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(AnthropicClient::new(config)?)))
    }

    /// The shared client, for callers that prompt it directly.
    pub fn client(&self) -> Arc<dyn Completion> {
        Arc::clone(&self.client)
    }

    pub fn create_translator(&self) -> Translator {
        Translator::new(self.client())
    }

    pub fn create_email_composer(&self) -> EmailComposer {
        EmailComposer::new(self.client())
    }

    /// Select a task variant by kind.
    pub fn create(&self, kind: TaskKind) -> Box<dyn Task> {
        match kind {
            TaskKind::Translate => Box::new(self.create_translator()),
            TaskKind::Email => Box::new(self.create_email_composer()),
        }
    }
}
