//! Request and response bodies for the `/ai` and `/orders` endpoints.

use cloudmart_core::{ChatMessage, ConversationId, OrderStatus, SupportThread, ThreadId};
use serde::{Deserialize, Serialize};

/// Reply used when the assistant answers in a shape we do not understand.
pub const UNREADABLE_ASSISTANT_REPLY: &str = "Sorry, I couldn't process that response.";

#[derive(Debug, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportStarted {
    pub thread_id: ThreadId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessageRequest<'a> {
    pub thread_id: &'a ThreadId,
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SupportReply {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeSentimentRequest<'a> {
    pub thread: SentimentThread<'a>,
}

#[derive(Debug, Serialize)]
pub struct SentimentThread<'a> {
    pub id: &'a ThreadId,
    pub name: &'a str,
    pub messages: &'a [ChatMessage],
}

impl<'a> From<&'a SupportThread> for AnalyzeSentimentRequest<'a> {
    fn from(thread: &'a SupportThread) -> Self {
        Self {
            thread: SentimentThread {
                id: &thread.id,
                name: &thread.name,
                messages: &thread.messages,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantStarted {
    pub conversation_id: ConversationId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantMessageRequest<'a> {
    pub conversation_id: &'a ConversationId,
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AssistantReply {
    #[serde(default)]
    pub response: serde_json::Value,
}

/// Extract the text of a shopping assistant reply.
///
/// The assistant answers either with a plain string or with an object whose
/// text sits under `options.output`. Anything else becomes a fixed apology.
#[must_use]
pub fn assistant_reply_text(response: &serde_json::Value) -> String {
    if let Some(text) = response.as_str() {
        return text.to_string();
    }

    response
        .pointer("/options/output")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(UNREADABLE_ASSISTANT_REPLY)
        .to_string()
}
