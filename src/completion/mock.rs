use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::Completion;

/// A scripted completion client for tests. Returns pre-defined replies
/// in order and records every prompt it was given.
pub struct MockCompletion {
    replies: Vec<Reply>,
    repeat_last: bool,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

#[derive(Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

impl MockCompletion {
    /// Reply with each string once, then fail.
    pub fn new(replies: Vec<impl Into<String>>) -> Self {
        Self::build(
            replies.into_iter().map(|r| Reply::Text(r.into())).collect(),
            false,
        )
    }

    /// Reply with the same text on every call.
    pub fn always(reply: impl Into<String>) -> Self {
        Self::build(vec![Reply::Text(reply.into())], true)
    }

    /// Fail every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::build(vec![Reply::Fail(message.into())], true)
    }

    fn build(replies: Vec<Reply>, repeat_last: bool) -> Self {
        Self {
            replies,
            repeat_last,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `complete` calls made.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completion for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        let i = self.index.fetch_add(1, Ordering::SeqCst);
        let reply = match self.replies.get(i) {
            Some(reply) => reply,
            None if self.repeat_last && !self.replies.is_empty() => {
                &self.replies[self.replies.len() - 1]
            }
            None => bail!("MockCompletion: no more replies (called {} times)", i + 1),
        };

        match reply.clone() {
            Reply::Text(text) => Ok(text),
            Reply::Fail(message) => bail!("{message}"),
        }
    }
}
