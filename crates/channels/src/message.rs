use serde::{Deserialize, Serialize};

/// Transport message types, as delivered by the chat network.
///
/// Only `Text` and `Audio` survive the dispatcher's nonsense filter; the
/// rest are enumerated so transports can classify without inventing their
/// own mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Unknown,
    Attachment,
    Audio,
    Contact,
    Emoticon,
    Image,
    Text,
    Location,
    Transfer,
    RedEnvelope,
    Recalled,
    Url,
    Video,
}

/// Where a message came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatScope {
    /// One-to-one chat with a contact.
    Private,
    /// Group chat; `topic` is the room's display topic.
    Group { topic: String },
}

/// A single inbound chat message, already resolved by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Display name of the sender.
    pub sender: String,
    /// True when the bot itself authored the message.
    pub from_self: bool,
    pub kind: MessageKind,
    pub body: String,
    pub scope: ChatScope,
}

impl InboundMessage {
    pub fn is_private(&self) -> bool {
        matches!(self.scope, ChatScope::Private)
    }

    /// The identity that keys session state: the room topic for group
    /// chats, the contact name for private chats.
    pub fn conversation_key(&self) -> &str {
        match &self.scope {
            ChatScope::Group { topic } => topic,
            ChatScope::Private => &self.sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(scope: ChatScope) -> InboundMessage {
        InboundMessage {
            sender: "alice".into(),
            from_self: false,
            kind: MessageKind::Text,
            body: "hi".into(),
            scope,
        }
    }

    #[test]
    fn private_key_is_sender() {
        let m = msg(ChatScope::Private);
        assert!(m.is_private());
        assert_eq!(m.conversation_key(), "alice");
    }

    #[test]
    fn group_key_is_topic() {
        let m = msg(ChatScope::Group {
            topic: "rustaceans".into(),
        });
        assert!(!m.is_private());
        assert_eq!(m.conversation_key(), "rustaceans");
    }

    #[test]
    fn scope_serializes_tagged() {
        let m = msg(ChatScope::Group {
            topic: "general".into(),
        });
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["scope"]["kind"], "group");
        assert_eq!(json["scope"]["topic"], "general");
        assert_eq!(json["kind"], "text");
    }
}
