//! Read-only view of the host session's execution history.
//!
//! The interactive host (a notebook kernel shim) records each executed turn;
//! the context builder only ever reads. `MemoryHistory` is the in-process
//! implementation used by tests and simple embeddings; kernel hosts wrap
//! their own history manager in the same trait.

use std::collections::HashMap;

/// One executed turn: session id, monotonic turn index, raw input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub session: u64,
    pub index: u64,
    pub source: String,
}

/// Captured output of a turn.
///
/// `rendered` holds a model-friendly textual/tabular form when the host has
/// one (a dataframe summary, for instance); `plain` is the generic string
/// conversion that always exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutput {
    pub rendered: Option<String>,
    pub plain: String,
}

impl TurnOutput {
    pub fn new(plain: impl Into<String>) -> Self {
        Self {
            rendered: None,
            plain: plain.into(),
        }
    }

    pub fn with_rendering(mut self, rendered: impl Into<String>) -> Self {
        self.rendered = Some(rendered.into());
        self
    }

    /// The text sent to the model: the rendering when available, otherwise
    /// the plain string form.
    pub fn context_text(&self) -> &str {
        self.rendered.as_deref().unwrap_or(&self.plain)
    }
}

/// What the core needs from the host's history manager.
///
/// Turn indices are monotonic and start at 1. Implementations never see
/// writes from this crate.
pub trait HistorySource {
    /// Entries for the half-open range `[start, stop)`, in execution order.
    /// `stop = None` means "through the latest recorded turn".
    fn range(&self, start: u64, stop: Option<u64>) -> Vec<HistoryEntry>;

    /// Captured output for a turn, if any was recorded.
    fn output(&self, index: u64) -> Option<TurnOutput>;

    /// Index of the most recently recorded turn (0 when empty).
    fn current_index(&self) -> u64;
}

/// In-process history, indices assigned 1, 2, 3, ... in record order.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    session: u64,
    entries: Vec<String>,
    outputs: HashMap<u64, TurnOutput>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: u64) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    /// Record an executed input and return the turn index it was assigned.
    pub fn record(&mut self, source: impl Into<String>) -> u64 {
        self.entries.push(source.into());
        self.entries.len() as u64
    }

    /// Attach a captured output to an already-recorded turn.
    pub fn record_output(&mut self, index: u64, output: TurnOutput) {
        self.outputs.insert(index, output);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.outputs.clear();
    }
}

impl HistorySource for MemoryHistory {
    fn range(&self, start: u64, stop: Option<u64>) -> Vec<HistoryEntry> {
        let latest = self.entries.len() as u64;
        let start = start.max(1);
        let stop = stop.unwrap_or(latest + 1).min(latest + 1);

        (start..stop)
            .map(|index| HistoryEntry {
                session: self.session,
                index,
                source: self.entries[(index - 1) as usize].clone(),
            })
            .collect()
    }

    fn output(&self, index: u64) -> Option<TurnOutput> {
        self.outputs.get(&index).cloned()
    }

    fn current_index(&self) -> u64 {
        self.entries.len() as u64
    }
}
