//! Frontend bridge for live markdown buffers.

use std::sync::Mutex;

use crate::display::markdown::{MarkdownBuffer, Stage};

/// Receives display lifecycle events for a `MarkdownBuffer`.
///
/// The host implements this against its own display protocol. `create` is
/// called once when a buffer first becomes visible; `update` replaces the
/// rendered content of the view identified by the buffer's display id.
pub trait DisplaySink: Send + Sync {
    fn create(&self, buffer: &MarkdownBuffer);
    fn update(&self, buffer: &MarkdownBuffer);
}

/// Sink for headless hosts. Callers read the buffer directly instead.
pub struct NullSink;

impl DisplaySink for NullSink {
    fn create(&self, _buffer: &MarkdownBuffer) {}
    fn update(&self, _buffer: &MarkdownBuffer) {}
}

// ---------- recording sink ----------

/// One recorded display event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkEvent {
    pub display_id: String,
    pub markdown: String,
    pub stage: Option<Stage>,
    pub created: bool,
}

/// In-memory sink that records every event, for tests and debugging.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<SinkEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, buffer: &MarkdownBuffer, created: bool) {
        self.events.lock().unwrap().push(SinkEvent {
            display_id: buffer.display_id().to_string(),
            markdown: buffer.text().to_string(),
            stage: buffer.stage(),
            created,
        });
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Markdown of the most recent event, when any.
    pub fn last_markdown(&self) -> Option<String> {
        self.events.lock().unwrap().last().map(|e| e.markdown.clone())
    }
}

impl DisplaySink for MemorySink {
    fn create(&self, buffer: &MarkdownBuffer) {
        self.record(buffer, true);
    }

    fn update(&self, buffer: &MarkdownBuffer) {
        self.record(buffer, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        let mut buffer = MarkdownBuffer::with_stage(Stage::Starting);

        sink.create(&buffer);
        buffer.append("hi");
        buffer.set_stage(Stage::Generating);
        sink.update(&buffer);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].created);
        assert_eq!(events[0].markdown, " ");
        assert_eq!(events[0].stage, Some(Stage::Starting));
        assert!(!events[1].created);
        assert_eq!(events[1].markdown, "hi");
        assert_eq!(events[1].stage, Some(Stage::Generating));
        assert_eq!(events[0].display_id, events[1].display_id);
    }

    #[test]
    fn test_last_markdown() {
        let sink = MemorySink::new();
        assert_eq!(sink.last_markdown(), None);

        let mut buffer = MarkdownBuffer::new();
        buffer.append("final");
        sink.update(&buffer);
        assert_eq!(sink.last_markdown().as_deref(), Some("final"));
    }
}
