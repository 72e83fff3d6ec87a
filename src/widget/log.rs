//! Append-only chat message log.
//!
//! Messages are immutable once created and are never deleted; the log grows
//! for the lifetime of the process, mirroring the chat history of a page that
//! is only cleared by a reload.

use std::sync::{Arc, RwLock};

/// A single chat turn, styled by sender role when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Display text, stored as submitted.
    pub text: String,
    /// `true` for user-submitted messages, `false` for bot replies.
    pub is_user: bool,
}

impl ChatMessage {
    /// Render the message as a chat bubble.
    #[must_use]
    pub fn to_html(&self) -> String {
        let role = if self.is_user {
            "user-bubble"
        } else {
            "bot-bubble"
        };
        format!(
            r#"<div class="chat-bubble {role}">{}</div>"#,
            escape(&self.text)
        )
    }
}

/// Thread-safe append-only message log.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    inner: Arc<MessageLogInner>,
}

#[derive(Debug, Default)]
struct MessageLogInner {
    messages: RwLock<Vec<ChatMessage>>,
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Infallible; there is no way to remove or edit an
    /// entry afterwards.
    pub fn append(&self, text: impl Into<String>, is_user: bool) {
        let mut guard = self.inner.messages.write().unwrap();
        guard.push(ChatMessage {
            text: text.into(),
            is_user,
        });
    }

    /// Snapshot of all messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.messages.read().unwrap().clone()
    }

    /// Number of messages appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.messages.read().unwrap().len()
    }

    /// Whether no message has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the whole log as chat bubbles, newest last.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.inner
            .messages
            .read()
            .unwrap()
            .iter()
            .map(ChatMessage::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Minimal HTML escaping for text rendered into bubble bodies.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_and_roles() {
        let log = MessageLog::new();
        assert!(log.is_empty());

        log.append("I feel great", true);
        log.append("Your happiness is contagious!", false);

        let messages = log.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user);
        assert_eq!(messages[0].text, "I feel great");
        assert!(!messages[1].is_user);
    }

    #[test]
    fn bubbles_are_styled_by_role() {
        let user = ChatMessage {
            text: "hi".to_string(),
            is_user: true,
        };
        let bot = ChatMessage {
            text: "hello".to_string(),
            is_user: false,
        };

        assert!(user.to_html().contains("user-bubble"));
        assert!(bot.to_html().contains("bot-bubble"));
    }

    #[test]
    fn bubble_text_is_escaped() {
        let msg = ChatMessage {
            text: "<script>alert('x')</script>".to_string(),
            is_user: true,
        };
        let html = msg.to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
