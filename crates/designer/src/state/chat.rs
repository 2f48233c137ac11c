use shared::{AiChatRequest, AiChatResponse, ObjectId};

use super::scene::SceneState;
use crate::error::DesignResult;

/// Role of a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
}

impl ChatMessage {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            is_error: false,
        }
    }

    fn assistant(text: impl Into<String>, is_error: bool) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            is_error,
        }
    }
}

/// Conversation with the assistant. At most one request is in flight.
#[derive(Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub is_loading: bool,
    pub last_failed_input: Option<String>,
}

impl ChatState {
    /// Take the input box text and build a request for the current scene.
    ///
    /// Returns `None` for blank input or while a request is pending.
    pub fn send_message(&mut self, scene: &SceneState) -> Option<AiChatRequest> {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.is_loading {
            return None;
        }
        self.input.clear();
        Some(self.begin(text, scene))
    }

    /// Re-send the last input that failed
    pub fn retry(&mut self, scene: &SceneState) -> Option<AiChatRequest> {
        if self.is_loading {
            return None;
        }
        let text = self.last_failed_input.take()?;
        Some(self.begin(text, scene))
    }

    fn begin(&mut self, text: String, scene: &SceneState) -> AiChatRequest {
        self.messages.push(ChatMessage::user(text.clone()));
        self.is_loading = true;
        AiChatRequest {
            message: text,
            scene: scene.scene.summary(),
        }
    }

    /// Apply the outcome of a request.
    ///
    /// A reply adds its whole batch in one history step; a failure leaves the
    /// scene untouched and is shown as an error message.
    pub fn finish(
        &mut self,
        result: DesignResult<AiChatResponse>,
        scene: &mut SceneState,
    ) -> Vec<ObjectId> {
        self.is_loading = false;
        let pending = self
            .messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.text.clone());

        let applied = result.and_then(|reply| {
            let ids = scene.add_objects(reply.objects)?;
            Ok((reply.message, ids))
        });

        match applied {
            Ok((message, ids)) => {
                let text = if message.trim().is_empty() {
                    "Objects created!".to_string()
                } else {
                    message
                };
                self.messages.push(ChatMessage::assistant(text, false));
                self.last_failed_input = None;
                ids
            }
            Err(e) => {
                tracing::warn!("Assistant request failed: {}", e);
                self.messages.push(ChatMessage::assistant(e.to_string(), true));
                self.last_failed_input = pending;
                Vec::new()
            }
        }
    }
}
