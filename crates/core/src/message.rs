//! Incoming chat message domain types.
//!
//! These are the value objects handed to the engine by the hosting bot:
//! Channel receives a group message → relationship lookup → engine builds prompts.

use serde::{Deserialize, Serialize};

/// Sender name used when the hosting framework provides none.
pub const DEFAULT_SENDER_NAME: &str = "某人";

/// Identifier of a chat group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message the agent may respond to. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// The text content
    pub text: String,

    /// Display name of the sender
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Relationship score between the agent and the sender (signed)
    #[serde(default)]
    pub relationship: f64,

    /// Group the message was posted in, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

fn default_sender_name() -> String {
    DEFAULT_SENDER_NAME.into()
}

impl IncomingMessage {
    /// Create a message with the default sender, neutral relationship and no group.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender_name: default_sender_name(),
            relationship: 0.0,
            group_id: None,
        }
    }

    pub fn with_sender(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.sender_name = if name.trim().is_empty() {
            default_sender_name()
        } else {
            name
        };
        self
    }

    pub fn with_relationship(mut self, score: f64) -> Self {
        self.relationship = score;
        self
    }

    pub fn in_group(mut self, group: GroupId) -> Self {
        self.group_id = Some(group);
        self
    }

    /// Sender name with the empty-name fallback applied.
    pub fn sender(&self) -> &str {
        if self.sender_name.trim().is_empty() {
            DEFAULT_SENDER_NAME
        } else {
            &self.sender_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let msg = IncomingMessage::new("你好")
            .with_sender("小明")
            .with_relationship(42.0)
            .in_group(GroupId::from("1001"));
        assert_eq!(msg.text, "你好");
        assert_eq!(msg.sender(), "小明");
        assert_eq!(msg.relationship, 42.0);
        assert_eq!(msg.group_id, Some(GroupId::from("1001")));
    }

    #[test]
    fn empty_sender_falls_back() {
        let msg = IncomingMessage::new("hi").with_sender("  ");
        assert_eq!(msg.sender(), DEFAULT_SENDER_NAME);
    }

    #[test]
    fn deserializes_with_defaults() {
        let msg: IncomingMessage = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(msg.sender(), DEFAULT_SENDER_NAME);
        assert_eq!(msg.relationship, 0.0);
        assert!(msg.group_id.is_none());
    }

    #[test]
    fn group_id_display() {
        assert_eq!(GroupId::from("42").to_string(), "42");
    }

    #[test]
    fn group_id_converts_from_str_and_string() {
        let a: GroupId = "lobby".into();
        let b: GroupId = String::from("lobby").into();
        assert_eq!(a, b);
        assert_eq!(a, GroupId("lobby".to_string()));
    }
}
