//! Context builder for assembling conversation windows from session history.
//!
//! Walks a turn range in execution order and emits, per eligible turn: the
//! user's input, the error it raised, the suggestion it got, the output it
//! produced. Pure over its read-only collaborators; a turn with missing
//! pieces just contributes fewer messages.

use crate::context::filters::CellFilter;
use crate::context::message::{ConversationWindow, Message};
use crate::session::history::HistorySource;
use crate::session::recall::SessionRecall;

/// Builds the candidate (untrimmed) window for one completion request.
pub struct ContextBuilder<'a> {
    history: &'a dyn HistorySource,
    recall: &'a SessionRecall,
    filter: &'a CellFilter,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(
        history: &'a dyn HistorySource,
        recall: &'a SessionRecall,
        filter: &'a CellFilter,
    ) -> Self {
        Self {
            history,
            recall,
            filter,
        }
    }

    /// Window over the half-open turn range `[start, stop)`.
    /// `stop = None` reaches through the latest recorded turn.
    pub fn build(&self, start: u64, stop: Option<u64>) -> ConversationWindow {
        let mut window = ConversationWindow::new();

        for entry in self.history.range(start.max(1), stop) {
            if entry.source.trim().is_empty() {
                continue;
            }
            if self.filter.is_ignored(&entry.source) {
                // The whole turn goes: input, error, reply, and output.
                continue;
            }

            window.push(Message::user(entry.source));

            if let Some(error) = self.recall.error_for(entry.index) {
                window.push(Message::system(error));
            }
            if let Some(reply) = self.recall.assist_for(entry.index) {
                window.push(Message::assistant(reply));
            }
            if let Some(output) = self.history.output(entry.index) {
                window.push(Message::system(output.context_text()));
            }
        }

        window
    }

    /// Window over the last `turns` turns before the current one.
    ///
    /// Start at `turns` before the current execution, never before turn 1,
    /// and stop short of the current execution itself.
    pub fn recent(&self, turns: u64) -> ConversationWindow {
        let current = self.history.current_index();
        let start = current.saturating_sub(turns).max(1);
        self.build(start, Some(current))
    }
}
