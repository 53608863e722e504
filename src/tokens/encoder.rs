//! Token encoders behind a narrow trait.
//!
//! The estimator only needs "how many tokens does this text encode to", so
//! the encoder is pluggable: production uses the real `cl100k_base` BPE
//! (every supported chat model tokenises with it), while tests substitute
//! deterministic fixed costs.

use std::sync::OnceLock;

use tiktoken_rs::{cl100k_base, CoreBPE};

/// Counts encoded tokens for a piece of text.
pub trait TokenEncoder: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

static BPE: OnceLock<CoreBPE> = OnceLock::new();

fn bpe() -> &'static CoreBPE {
    // The vocabulary is embedded in the binary; loading it cannot fail at
    // runtime.
    BPE.get_or_init(|| cl100k_base().expect("embedded cl100k_base vocabulary"))
}

/// The real tokenizer used by the supported chat models.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cl100kEncoder;

impl TokenEncoder for Cl100kEncoder {
    fn count(&self, text: &str) -> usize {
        bpe().encode_with_special_tokens(text).len()
    }
}

/// Character-based estimation (1 token ~ 4 chars), for hosts that want to
/// skip BPE initialisation. Good enough for budget management, not for
/// billing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxEncoder;

impl TokenEncoder for ApproxEncoder {
    fn count(&self, text: &str) -> usize {
        // Add 3 to avoid underestimating short strings.
        (text.len() + 3) / 4
    }
}
