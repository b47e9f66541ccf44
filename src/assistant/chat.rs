use crate::api::ApiError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const GREETING: &str =
    "Hey! I'm OptiTask, your productivity companion. What can I help you with?";

/// Used when the server answers without any text
pub const DEFAULT_REPLY: &str = "I understand!";

/// Replaces the reply when the chat request fails
pub const CONNECTION_FALLBACK: &str =
    "Oops! Having trouble connecting. Make sure the backend is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}

/// Body of a `POST /chat` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Server-side actions that change tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    AddTask,
    CompleteTask,
    DeleteTask,
}

impl ChatAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "add_task" => Some(ChatAction::AddTask),
            "complete_task" => Some(ChatAction::CompleteTask),
            "delete_task" => Some(ChatAction::DeleteTask),
            _ => None,
        }
    }
}

impl ChatReply {
    /// Reply text, or the default when the server sent none
    pub fn text(&self) -> &str {
        self.response
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REPLY)
    }

    pub fn action(&self) -> Option<ChatAction> {
        self.action.as_deref().and_then(ChatAction::parse)
    }
}

/// What the caller has to do after a reply lands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyOutcome {
    /// Text to read aloud
    pub speak: Option<String>,
    /// The assistant changed tasks on the server
    pub reload: bool,
}

/// Assistant panel state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    input: String,
    loading: bool,
    speaking: bool,
}

impl Conversation {
    pub fn new(speaking: bool) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            input: String::new(),
            loading: false,
            speaking,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Replace the input, e.g. with a voice transcript
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// Mute or unmute spoken replies; returns the new setting
    pub fn toggle_speech(&mut self) -> bool {
        self.speaking = !self.speaking;
        self.speaking
    }

    /// Take the typed message for sending.
    /// None when the input is blank or a reply is still pending.
    pub fn begin_send(&mut self) -> Option<String> {
        let message = self.input.trim().to_string();
        if message.is_empty() || self.loading {
            return None;
        }

        self.input.clear();
        self.messages.push(ChatMessage::user(&message));
        self.loading = true;
        Some(message)
    }

    /// Record the reply (or failure) to the pending message
    pub fn receive(&mut self, result: Result<ChatReply, ApiError>) -> ReplyOutcome {
        self.loading = false;
        match result {
            Ok(reply) => {
                let text = reply.text().to_string();
                let action = reply.action();
                debug!(?action, "assistant replied");
                self.messages.push(ChatMessage::assistant(&text));
                ReplyOutcome {
                    speak: self.speaking.then_some(text),
                    reload: action.is_some(),
                }
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.messages.push(ChatMessage::assistant(CONNECTION_FALLBACK));
                ReplyOutcome::default()
            }
        }
    }
}
