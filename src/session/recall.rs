//! Per-session recall of past errors and past assistant replies.
//!
//! Two turn-indexed tables feed the context builder: errors captured by the
//! exception path and suggestions produced by the assist path. They live for
//! one session and are cleared explicitly between independent sessions or
//! tests. A single advisory lock guards both; no concurrent writers are
//! expected from a cooperative single-turn host.

use std::collections::HashMap;
use std::sync::Mutex;

/// How many stack frames of a traceback survive into recalled context.
pub const TRACEBACK_FRAME_LIMIT: usize = 3;

/// A host-captured exception, already stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    /// Exception type name, e.g. `ZeroDivisionError`.
    pub kind: String,
    /// The exception's own message.
    pub message: String,
    /// Formatted stack frames, innermost last.
    pub frames: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            frames: Vec::new(),
        }
    }

    pub fn with_frames(mut self, frames: Vec<String>) -> Self {
        self.frames = frames;
        self
    }

    /// `"{kind}: {message}"` plus at most `max_frames` stack frames.
    ///
    /// Keeps recalled errors from growing without bound when a turn blew up
    /// deep inside a library.
    pub fn condensed(&self, max_frames: usize) -> String {
        let mut text = format!("{}: {}", self.kind, self.message);
        for frame in self.frames.iter().take(max_frames) {
            text.push('\n');
            text.push_str(frame);
        }
        text
    }

    /// The full report, all frames included. Callers bound its length.
    pub fn report(&self) -> String {
        self.condensed(self.frames.len())
    }
}

#[derive(Debug, Default)]
struct RecallTables {
    errors: HashMap<u64, String>,
    assists: HashMap<u64, String>,
}

/// The two process-wide lookup tables, as an explicit store passed by
/// reference rather than true global state.
#[derive(Debug, Default)]
pub struct SessionRecall {
    inner: Mutex<RecallTables>,
}

impl SessionRecall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the error captured for a turn.
    pub fn record_error(&self, turn: u64, error: &ExceptionInfo) {
        let condensed = error.condensed(TRACEBACK_FRAME_LIMIT);
        self.inner.lock().unwrap().errors.insert(turn, condensed);
    }

    pub fn error_for(&self, turn: u64) -> Option<String> {
        self.inner.lock().unwrap().errors.get(&turn).cloned()
    }

    /// Record (or overwrite) the assistant reply produced for a turn.
    pub fn record_assist(&self, turn: u64, text: impl Into<String>) {
        self.inner.lock().unwrap().assists.insert(turn, text.into());
    }

    pub fn assist_for(&self, turn: u64) -> Option<String> {
        self.inner.lock().unwrap().assists.get(&turn).cloned()
    }

    /// Drop both tables. Used between independent sessions and tests.
    pub fn clear(&self) {
        let mut tables = self.inner.lock().unwrap();
        tables.errors.clear();
        tables.assists.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_insert_and_lookup() {
        let recall = SessionRecall::new();
        let error = ExceptionInfo::new("NameError", "name 'df' is not defined");
        recall.record_error(3, &error);

        assert_eq!(
            recall.error_for(3).unwrap(),
            "NameError: name 'df' is not defined"
        );
        assert!(recall.error_for(4).is_none());
    }

    #[test]
    fn test_error_overwrite_wins() {
        let recall = SessionRecall::new();
        recall.record_error(1, &ExceptionInfo::new("ValueError", "first"));
        recall.record_error(1, &ExceptionInfo::new("ValueError", "second"));

        assert_eq!(recall.error_for(1).unwrap(), "ValueError: second");
    }

    #[test]
    fn test_condensed_bounds_frames() {
        let frames: Vec<String> = (0..10).map(|i| format!("  File \"<cell>\", line {i}")).collect();
        let error = ExceptionInfo::new("RuntimeError", "boom").with_frames(frames);

        let condensed = error.condensed(TRACEBACK_FRAME_LIMIT);
        assert_eq!(condensed.lines().count(), 1 + TRACEBACK_FRAME_LIMIT);
        assert!(condensed.starts_with("RuntimeError: boom"));
    }

    #[test]
    fn test_report_keeps_all_frames() {
        let error = ExceptionInfo::new("TypeError", "bad call")
            .with_frames(vec!["frame one".into(), "frame two".into()]);
        assert_eq!(error.report(), "TypeError: bad call\nframe one\nframe two");
    }

    #[test]
    fn test_assist_recall_lifecycle() {
        let recall = SessionRecall::new();
        recall.record_assist(7, "```python\ndf.plot()\n```");

        assert_eq!(recall.assist_for(7).unwrap(), "```python\ndf.plot()\n```");

        recall.clear();
        assert!(recall.assist_for(7).is_none());
        assert!(recall.error_for(7).is_none());
    }
}
