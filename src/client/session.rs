//! Client-side chat state: the conversation list, the active chat, and
//! what happens to them when a message is sent.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Result, bail};
use tracing::warn;

use crate::consts::CHAT_ERROR_REPLY;
use crate::conversation::{Conversation, Message};

use super::{ApiClient, Attachment};

/// What a send did to the active chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// The assistant message that was appended.
    pub reply: Message,
    /// Set when the request failed and `reply` is the stock error message.
    pub failed: bool,
    /// The new title, if it was refreshed.
    pub title: Option<String>,
}

/// All chats of one client session. Chats are never deleted.
#[derive(Debug, Default)]
pub struct ChatSession {
    chats: Vec<Conversation>,
    current: Option<usize>,
    last_id: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chats(&self) -> &[Conversation] {
        &self.chats
    }

    pub fn current(&self) -> Option<&Conversation> {
        self.current.map(|i| &self.chats[i])
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Start an empty chat and make it active.
    pub fn new_chat(&mut self) -> &Conversation {
        let id = self.next_id();
        self.chats.push(Conversation::new(id));
        let index = self.chats.len() - 1;
        self.current = Some(index);
        &self.chats[index]
    }

    /// Make the chat at `index` (0-based) active.
    pub fn switch(&mut self, index: usize) -> Result<&Conversation> {
        if index >= self.chats.len() {
            bail!("no chat #{} (have {})", index + 1, self.chats.len());
        }
        self.current = Some(index);
        Ok(&self.chats[index])
    }

    /// Send `input` (plus files) in the active chat.
    ///
    /// On success the user message and the reply are appended and the
    /// title is refreshed from the whole conversation. On failure only the
    /// stock error reply is appended. A failed title refresh leaves the
    /// old title in place.
    pub async fn send(
        &mut self,
        api: &ApiClient,
        input: &str,
        files: &[Attachment],
    ) -> Result<SendOutcome> {
        let Some(index) = self.current else {
            bail!("no active chat");
        };
        if input.trim().is_empty() && files.is_empty() {
            bail!("nothing to send");
        }

        let mut outgoing = self.chats[index].messages.clone();
        outgoing.push(Message::user(input));

        let reply = match api.chat(&outgoing, files).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "chat request failed");
                let reply = Message::assistant(CHAT_ERROR_REPLY);
                self.chats[index].push(reply.clone());
                return Ok(SendOutcome {
                    reply,
                    failed: true,
                    title: None,
                });
            }
        };

        let reply = Message::assistant(reply);
        outgoing.push(reply.clone());
        self.chats[index].messages = outgoing;

        let title = match api.generate_title(&self.chats[index].messages).await {
            Ok(title) => {
                self.chats[index].title = title.clone();
                Some(title)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "title generation failed");
                None
            }
        };

        Ok(SendOutcome {
            reply,
            failed: false,
            title,
        })
    }

    /// Millisecond timestamp, bumped if two chats land in the same tick.
    fn next_id(&mut self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.last_id = now.max(self.last_id + 1);
        self.last_id.to_string()
    }
}
