//! Support chat and shopping assistant commands.

use cloudmart_core::{ChatSender, SupportThread};
use cloudmart_storefront::state::Storefront;

use super::Result;

pub fn list(storefront: &Storefront) -> Result {
    let threads = storefront.support().threads()?;
    if threads.is_empty() {
        println!("No support threads.");
        return Ok(());
    }

    for thread in &threads {
        println!("{}", format_thread(thread));
    }
    Ok(())
}

/// Open a thread with the backend and record it locally.
pub async fn new_thread(storefront: &Storefront) -> Result {
    let thread = storefront.support_chat().start().await?;
    println!("Started {} ({})", thread.name, thread.id);
    Ok(())
}

/// Send `message` on the first active thread and print the reply.
pub async fn send(storefront: &Storefront, message: &str) -> Result {
    let reply = storefront.support_chat().send(message).await?;
    println!("{reply}");
    Ok(())
}

/// Submit the first active thread for sentiment analysis and end it.
pub async fn end(storefront: &Storefront) -> Result {
    let ended = storefront.support_chat().end_active().await?;
    println!("Ended {}", ended.name);
    Ok(())
}

/// One-shot question to the shopping assistant.
pub async fn ask_assistant(storefront: &Storefront, message: &str) -> Result {
    let api = storefront.api();
    let conversation = api.start_assistant().await?;
    let reply = api.send_assistant_message(&conversation, message).await?;
    println!("{reply}");
    Ok(())
}

fn format_thread(thread: &SupportThread) -> String {
    let state = if thread.ended { "ended" } else { "active" };
    let last = thread
        .messages
        .last()
        .map(|message| {
            let who = match message.sender {
                ChatSender::User => "you",
                ChatSender::Ai => "agent",
            };
            format!(" - {who}: {}", message.text)
        })
        .unwrap_or_default();
    format!("{} [{state}] {} message(s){last}", thread.name, thread.messages.len())
}

#[cfg(test)]
mod tests {
    use cloudmart_core::{ChatMessage, ThreadId};

    use super::*;

    #[test]
    fn test_format_thread() {
        let mut thread = SupportThread {
            id: ThreadId::from("t-1"),
            name: "Thread 1".to_string(),
            messages: Vec::new(),
            ended: false,
        };
        assert_eq!(format_thread(&thread), "Thread 1 [active] 0 message(s)");

        thread.messages.push(ChatMessage::user("where is my order?"));
        thread.messages.push(ChatMessage::ai("It shipped today."));
        thread.ended = true;
        assert_eq!(
            format_thread(&thread),
            "Thread 1 [ended] 2 message(s) - agent: It shipped today."
        );
    }
}
