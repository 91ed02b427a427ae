//! Role-tagged message values.
//!
//! These are the value objects that flow through one tutoring turn:
//! the engine builds an ordered list of them (system prompt, replayed
//! history, current user message) and hands it to the completion service.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (persona, rules, curriculum context)
    System,
    /// The student
    User,
    /// The AI tutor
    Assistant,
}

/// A single message in the list sent to the completion service.
///
/// Serializes directly to the OpenAI chat-completions wire shape
/// (`{"role": "...", "content": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Kas yra antrasis Niutono dėsnis?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Kas yra antrasis Niutono dėsnis?");
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = Message::system("Tu esi tutorius");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"system""#));
        assert!(json.contains(r#""content":"Tu esi tutorius""#));
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::assistant("Jėga lygi masei padaugintai iš pagreičio.");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, msg);
    }
}
