//! Chat history records shared by the session store and the completion
//! backends.
//!
//! A [`ChatRecord`] is exactly what gets sent to an OpenAI-compatible
//! `messages` array, so the serde names follow that wire format.

use serde::{Deserialize, Serialize};

/// Who authored a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub role: Role,
    pub content: String,
}

impl ChatRecord {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

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
    fn role_serializes_lowercase() {
        let rec = ChatRecord::assistant("hi");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn record_deserializes_from_wire_format() {
        let json = serde_json::json!({ "role": "system", "content": "be helpful" });
        let rec: ChatRecord = serde_json::from_value(json).unwrap();
        assert_eq!(rec.role, Role::System);
        assert_eq!(rec.content, "be helpful");
    }
}
