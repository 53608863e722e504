//! Updatable markdown buffer for streaming completions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::display::sink::DisplaySink;
use crate::providers::base::CompletionStream;

/// The stage of feedback generation, shipped as metadata next to the
/// markdown payload so frontends can style in-progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Starting,
    Generating,
    Finished,
}

/// A markdown string that can be updated in place.
///
/// Each buffer carries a random display id so a frontend can route updates
/// to the right output area. Content is appended fragment by fragment as a
/// completion streams in; `text` always returns something renderable.
#[derive(Debug, Clone)]
pub struct MarkdownBuffer {
    message: String,
    display_id: String,
    stage: Option<Stage>,
}

impl Default for MarkdownBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownBuffer {
    pub fn new() -> Self {
        Self {
            message: String::new(),
            display_id: Uuid::new_v4().simple().to_string()[..16].to_string(),
            stage: None,
        }
    }

    pub fn with_stage(stage: Stage) -> Self {
        let mut buffer = Self::new();
        buffer.stage = Some(stage);
        buffer
    }

    pub fn display_id(&self) -> &str {
        &self.display_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// The renderable text. Empty buffers render as a single space since
    /// some frontends reject empty markdown payloads.
    pub fn text(&self) -> &str {
        if self.message.is_empty() {
            " "
        } else {
            &self.message
        }
    }

    pub fn append(&mut self, delta: &str) {
        self.message.push_str(delta);
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn set_stage(&mut self, stage: Stage) {
        self.stage = Some(stage);
    }

    /// Return the buffer to a blank state. The display id is kept so an
    /// interrupted generation clears its own output area.
    pub fn reset(&mut self) {
        self.message.clear();
        self.stage = None;
    }

    /// Pull every fragment off the stream, appending each to the buffer and
    /// pushing one sink update per fragment. Fragments are applied in
    /// arrival order and none are skipped.
    pub async fn consume(&mut self, stream: &mut CompletionStream, sink: &dyn DisplaySink) {
        while let Some(delta) = stream.next_delta().await {
            self.append(&delta);
            sink.update(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::sink::{MemorySink, NullSink};
    use crate::providers::base::{CompletionStream, StreamEvent};

    #[test]
    fn test_display_id_is_sixteen_hex_chars() {
        let buffer = MarkdownBuffer::new();
        assert_eq!(buffer.display_id().len(), 16);
        assert!(buffer.display_id().chars().all(|c| c.is_ascii_hexdigit()));

        // Ids are per-buffer.
        assert_ne!(buffer.display_id(), MarkdownBuffer::new().display_id());
    }

    #[test]
    fn test_empty_buffer_renders_a_space() {
        let buffer = MarkdownBuffer::new();
        assert_eq!(buffer.message(), "");
        assert_eq!(buffer.text(), " ");
    }

    #[test]
    fn test_append_accumulates() {
        let mut buffer = MarkdownBuffer::new();
        buffer.append("Hello");
        buffer.append(" world!");
        assert_eq!(buffer.text(), "Hello world!");
    }

    #[test]
    fn test_reset_blanks_content_and_stage() {
        let mut buffer = MarkdownBuffer::with_stage(Stage::Generating);
        buffer.append("partial sugg");
        buffer.reset();
        assert_eq!(buffer.message(), "");
        assert_eq!(buffer.stage(), None);
        assert_eq!(buffer.text(), " ");
    }

    #[test]
    fn test_stage_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Stage::Starting).unwrap(),
            "\"starting\""
        );
        assert_eq!(
            serde_json::to_string(&Stage::Generating).unwrap(),
            "\"generating\""
        );
        assert_eq!(
            serde_json::to_string(&Stage::Finished).unwrap(),
            "\"finished\""
        );
    }

    #[tokio::test]
    async fn test_consume_appends_every_fragment_in_order() {
        let (tx, mut stream) = CompletionStream::channel();
        tx.send(StreamEvent::Delta("def f():".to_string())).unwrap();
        tx.send(StreamEvent::Delta("\n".to_string())).unwrap();
        tx.send(StreamEvent::Delta("    pass".to_string())).unwrap();
        tx.send(StreamEvent::Done).unwrap();

        let mut buffer = MarkdownBuffer::new();
        buffer.consume(&mut stream, &NullSink).await;
        assert_eq!(buffer.text(), "def f():\n    pass");
    }

    #[tokio::test]
    async fn test_consume_updates_the_sink_per_fragment() {
        let (tx, mut stream) = CompletionStream::channel();
        tx.send(StreamEvent::Delta("a".to_string())).unwrap();
        tx.send(StreamEvent::Delta("b".to_string())).unwrap();
        tx.send(StreamEvent::Delta("c".to_string())).unwrap();
        tx.send(StreamEvent::Done).unwrap();

        let sink = MemorySink::new();
        let mut buffer = MarkdownBuffer::new();
        buffer.consume(&mut stream, &sink).await;

        let markdowns: Vec<String> = sink.events().into_iter().map(|e| e.markdown).collect();
        assert_eq!(markdowns, vec!["a", "ab", "abc"]);
    }
}
