//! Oldest-first window trimming.
//!
//! The shipped eviction policy: drop whole messages from the front of the
//! window until the estimated total fits the model's budget. Recency-biased,
//! order-preserving, never partial — a message either survives intact or is
//! gone.

use crate::context::message::ConversationWindow;
use crate::errors::TokenError;
use crate::tokens::estimate::{ensure_chat_model, TokenEstimator, REPLY_PRIMING};
use crate::tokens::limits::context_limit;

/// Reduce a window until it fits the token budget.
///
/// The budget is the explicit `max_tokens` when given, otherwise the model's
/// table limit. The result is always a contiguous tail of the input, empty
/// when even the newest message alone cannot fit (a zero budget included) —
/// callers proceed with no prior context rather than failing.
///
/// An unknown model is an error and leaves the input untouched.
pub fn trim_to_fit(
    window: &ConversationWindow,
    model: &str,
    max_tokens: Option<usize>,
    estimator: &TokenEstimator,
) -> Result<ConversationWindow, TokenError> {
    ensure_chat_model(model)?;
    let budget = match max_tokens {
        Some(limit) => limit,
        None => context_limit(model)?,
    };

    let costs: Vec<usize> = window
        .messages()
        .iter()
        .map(|m| estimator.message_tokens(m))
        .collect();
    let mut total: usize = costs.iter().sum::<usize>() + REPLY_PRIMING;

    let mut cut = 0;
    while total > budget && cut < costs.len() {
        total -= costs[cut];
        cut += 1;
    }

    Ok(ConversationWindow::from(window.messages()[cut..].to_vec()))
}
