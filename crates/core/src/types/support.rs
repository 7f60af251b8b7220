//! Support chat threads and the tickets the backend files from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ThreadId, TicketId};
use super::status::TicketStatus;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    Ai,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: ChatSender,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: ChatSender::User,
        }
    }

    #[must_use]
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: ChatSender::Ai,
        }
    }
}

/// A support conversation kept on the client.
///
/// Once `ended` is set the thread has been handed to the backend for
/// sentiment analysis and accepts no further messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportThread {
    pub id: ThreadId,
    pub name: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub ended: bool,
}

/// A support ticket as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub status: TicketStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub overall_sentiment: Option<String>,
    /// Either a message array or a JSON-encoded string of one, depending on
    /// how the ticket was filed.
    #[serde(default)]
    pub conversation: serde_json::Value,
}

impl Ticket {
    /// Conversation messages, decoding the string form when needed.
    ///
    /// Returns an empty list for conversations in any other shape.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        match &self.conversation {
            serde_json::Value::String(raw) => serde_json::from_str(raw).unwrap_or_default(),
            value @ serde_json::Value::Array(_) => {
                serde_json::from_value(value.clone()).unwrap_or_default()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_record_shape() {
        let thread = SupportThread {
            id: ThreadId::from("t-1"),
            name: "Thread 1".to_string(),
            messages: vec![ChatMessage::user("hi"), ChatMessage::ai("hello")],
            ended: false,
        };
        assert_eq!(
            serde_json::to_value(&thread).unwrap(),
            serde_json::json!({
                "id": "t-1",
                "name": "Thread 1",
                "messages": [
                    {"text": "hi", "sender": "user"},
                    {"text": "hello", "sender": "ai"}
                ],
                "ended": false
            })
        );
    }

    #[test]
    fn test_ticket_messages_from_string_or_array() {
        let array: Ticket = serde_json::from_str(
            r#"{"id": 1, "status": "open", "conversation": [{"text": "hi", "sender": "user"}]}"#,
        )
        .unwrap();
        assert_eq!(array.messages(), vec![ChatMessage::user("hi")]);

        let string: Ticket = serde_json::from_str(
            r#"{"id": 2, "status": "closed", "overallSentiment": "positive",
                "conversation": "[{\"text\": \"thanks\", \"sender\": \"user\"}]"}"#,
        )
        .unwrap();
        assert_eq!(string.messages(), vec![ChatMessage::user("thanks")]);
        assert_eq!(string.overall_sentiment.as_deref(), Some("positive"));

        let plain: Ticket =
            serde_json::from_str(r#"{"id": 3, "status": "in_progress", "conversation": 5}"#)
                .unwrap();
        assert!(plain.messages().is_empty());
    }
}
