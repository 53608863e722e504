//! Configuration schema for cellmate.
//!
//! Every section is independently defaultable, so a partial config file (or
//! none at all) still yields a working [`Config`]. Keys are camelCase on disk.

use serde::{Deserialize, Serialize};

use crate::context::filters::{CellFilter, DEFAULT_IGNORE_PREFIXES, DEFAULT_KEEP_MARKERS};
use crate::providers::openai::OPENAI_API_BASE;

/// API credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// OpenAI API key; empty means unset.
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    OPENAI_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            organization: None,
            api_base: default_api_base(),
        }
    }
}

/// Suggestion generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// How many prior turns feed the context window.
    #[serde(default = "default_context_turns")]
    pub context_turns: u64,
    /// Stream fragments as they generate instead of waiting for the full
    /// completion.
    #[serde(default = "default_stream")]
    pub stream: bool,
}

fn default_model() -> String {
    "gpt-3.5-turbo-0301".to_string()
}

fn default_context_turns() -> u64 {
    5
}

fn default_stream() -> bool {
    true
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            context_turns: default_context_turns(),
            stream: default_stream(),
        }
    }
}

/// Which history turns stay out of context, and which are pinned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
    #[serde(default = "default_keep_markers")]
    pub keep_markers: Vec<String>,
}

fn default_ignore_prefixes() -> Vec<String> {
    DEFAULT_IGNORE_PREFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_keep_markers() -> Vec<String> {
    DEFAULT_KEEP_MARKERS.iter().map(|s| s.to_string()).collect()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_prefixes: default_ignore_prefixes(),
            keep_markers: default_keep_markers(),
        }
    }
}

impl FilterConfig {
    /// The matcher the context builder and trimmer consume.
    pub fn cell_filter(&self) -> CellFilter {
        CellFilter::new(self.ignore_prefixes.clone(), self.keep_markers.clone())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub assist: AssistConfig,
    #[serde(default)]
    pub filters: FilterConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_a_write_read_cycle() {
        let json = serde_json::to_string_pretty(&Config::default()).unwrap();
        let cfg: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.assist.model, "gpt-3.5-turbo-0301");
        assert_eq!(cfg.assist.context_turns, 5);
        assert_eq!(cfg.api.api_base, OPENAI_API_BASE);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = r#"{"api": {"apiKey": "sk-x"}, "assist": {"contextTurns": 3}}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.api.api_key, "sk-x");
        assert_eq!(cfg.assist.context_turns, 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let json = r#"{"assist": {"model": "gpt-4"}}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.assist.model, "gpt-4");
        assert_eq!(cfg.assist.context_turns, 5);
        assert!(cfg.assist.stream);
        assert!(cfg.api.api_key.is_empty());
        assert!(!cfg.filters.ignore_prefixes.is_empty());
    }

    #[test]
    fn test_explicit_empty_filters_stay_empty() {
        let json = r#"{"filters": {"ignorePrefixes": [], "keepMarkers": []}}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(cfg.filters.ignore_prefixes.is_empty());

        let filter = cfg.filters.cell_filter();
        assert!(!filter.is_ignored("#ignore"));
    }

    #[test]
    fn test_cell_filter_bridge_uses_configured_lists() {
        let cfg = Config::default();
        let filter = cfg.filters.cell_filter();
        assert!(filter.is_ignored("%%assist\nmake a plot"));
        assert!(filter.is_keep("setup() #keep"));
    }
}
