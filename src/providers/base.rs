//! Base completion client interface.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::context::message::Message;

/// One event from a streaming completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text content from the model.
    Delta(String),
    /// Stream complete.
    Done,
}

/// Pull side of a streaming completion.
///
/// Finite, single-pass, non-restartable: callers pull fragments one at a
/// time until `next_delta` returns `None`. Abandoning the stream mid-way is
/// fine; the remaining fragments are simply discarded.
pub struct CompletionStream {
    rx: UnboundedReceiver<StreamEvent>,
}

impl CompletionStream {
    /// Channel pair for implementations: push events into the sender, hand
    /// the stream to the consumer.
    pub fn channel() -> (UnboundedSender<StreamEvent>, Self) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// A one-fragment stream wrapping an already-complete response.
    pub fn from_text(text: impl Into<String>) -> Self {
        let (tx, stream) = Self::channel();
        let _ = tx.send(StreamEvent::Delta(text.into()));
        let _ = tx.send(StreamEvent::Done);
        stream
    }

    /// The next text fragment, or `None` once the stream has ended.
    pub async fn next_delta(&mut self) -> Option<String> {
        match self.rx.recv().await {
            Some(StreamEvent::Delta(text)) => Some(text),
            Some(StreamEvent::Done) | None => None,
        }
    }
}

/// Abstract interface to the completion API.
///
/// Implementations handle the specifics of their provider's protocol while
/// the rest of the crate only ever sees (model, messages) in and text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a chat completion request and return the reply text.
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String>;

    /// Send a streaming chat completion request.
    ///
    /// Default implementation falls back to buffered `complete()` delivered
    /// as a single fragment.
    async fn complete_stream(&self, model: &str, messages: &[Message]) -> Result<CompletionStream> {
        let content = self.complete(model, messages).await?;
        Ok(CompletionStream::from_text(content))
    }
}
