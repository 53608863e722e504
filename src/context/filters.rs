//! Ignore-prefix and keep-marker matching for history turns.
//!
//! Users control what leaves the session by marking cells: a line starting
//! with an ignore prefix excludes that whole turn from any context window,
//! and a keep marker flags a turn for priority retention when trimming with
//! the keep-aware policy.

/// Turns starting with any of these never reach the completion API.
///
/// Covers explicit ignore markers, the assistant's own invocation header,
/// shell bootstrap commands, and package installs.
pub const DEFAULT_IGNORE_PREFIXES: &[&str] = &[
    "# cellmate:ignore",
    "#ignore",
    "# ignore",
    "%%assist",
    "#%%assist",
    "get_ipython",
    "%load_ext",
    "%pip install",
];

/// Turns containing any of these are kept for sure, in case the
/// history is too long.
pub const DEFAULT_KEEP_MARKERS: &[&str] = &["#keep", "# keep"];

/// Literal matchers evaluated against each raw turn text, in order.
#[derive(Debug, Clone)]
pub struct CellFilter {
    pub ignore_prefixes: Vec<String>,
    pub keep_markers: Vec<String>,
}

impl Default for CellFilter {
    fn default() -> Self {
        Self {
            ignore_prefixes: DEFAULT_IGNORE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            keep_markers: DEFAULT_KEEP_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CellFilter {
    pub fn new(ignore_prefixes: Vec<String>, keep_markers: Vec<String>) -> Self {
        Self {
            ignore_prefixes,
            keep_markers,
        }
    }

    /// True if the turn's raw input starts with any configured ignore prefix.
    pub fn is_ignored(&self, input: &str) -> bool {
        self.ignore_prefixes.iter().any(|p| input.starts_with(p))
    }

    /// True if the turn's raw input contains any configured keep marker.
    pub fn is_keep(&self, input: &str) -> bool {
        self.keep_markers.iter().any(|m| input.contains(m))
    }
}
