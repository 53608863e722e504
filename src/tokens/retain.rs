//! Keep-priority window trimming.
//!
//! The alternative eviction policy: split the window into an older and a
//! newer half, let the older half contribute only messages carrying a keep
//! marker, and recursively allocate whatever budget remains to the newer
//! half. Unlike `trim_to_fit` this can preserve old turns at the expense of
//! newer ones, and it refuses to run at all when the mandatory content alone
//! blows the budget — that is a configuration error the user must see.
//!
//! The two policies are not equivalent; callers opt into this one.

use crate::context::filters::CellFilter;
use crate::context::message::{ConversationWindow, Message};
use crate::errors::TokenError;
use crate::tokens::estimate::{ensure_chat_model, TokenEstimator, REPLY_PRIMING};
use crate::tokens::limits::context_limit;

/// Reduce a window to the budget while preserving keep-marked messages.
///
/// Budget resolution matches `trim_to_fit`: the explicit `max_tokens` when
/// given, otherwise the model's table limit. The reply-priming cost is
/// reserved up front so the result satisfies the same window invariant.
///
/// Fails with `TokenError::MandatoryOverflow` when keep-marked content alone
/// exceeds the budget.
pub fn trim_with_retention(
    window: &ConversationWindow,
    model: &str,
    max_tokens: Option<usize>,
    filter: &CellFilter,
    estimator: &TokenEstimator,
) -> Result<ConversationWindow, TokenError> {
    ensure_chat_model(model)?;
    let budget = match max_tokens {
        Some(limit) => limit,
        None => context_limit(model)?,
    };

    let kept = retain(
        window.messages(),
        budget.saturating_sub(REPLY_PRIMING),
        filter,
        estimator,
    )?;
    Ok(ConversationWindow::from(kept))
}

fn cost_of(messages: &[Message], estimator: &TokenEstimator) -> usize {
    messages.iter().map(|m| estimator.message_tokens(m)).sum()
}

fn retain(
    messages: &[Message],
    budget: usize,
    filter: &CellFilter,
    estimator: &TokenEstimator,
) -> Result<Vec<Message>, TokenError> {
    if messages.is_empty() {
        return Ok(Vec::new());
    }

    if messages.len() == 1 {
        let cost = estimator.message_tokens(&messages[0]);
        if cost <= budget {
            return Ok(messages.to_vec());
        }
        if filter.is_keep(&messages[0].content) {
            return Err(TokenError::MandatoryOverflow {
                required: cost,
                budget,
            });
        }
        // Whole-message granularity: an oversized ordinary message is
        // dropped, never partially truncated.
        return Ok(Vec::new());
    }

    // Split into halves, with a preference for keep-marked messages from
    // the older half.
    let mid = messages.len() / 2;
    let (older, newer) = messages.split_at(mid);

    let keepers: Vec<Message> = older
        .iter()
        .filter(|m| filter.is_keep(&m.content))
        .cloned()
        .collect();
    let keeper_cost = cost_of(&keepers, estimator);

    if keeper_cost > budget {
        return Err(TokenError::MandatoryOverflow {
            required: keeper_cost,
            budget,
        });
    }

    // Keeps plus the entire newer half may already fit.
    if keeper_cost + cost_of(newer, estimator) <= budget {
        let mut kept = keepers;
        kept.extend_from_slice(newer);
        return Ok(kept);
    }

    // Split the newer half now to see if we can fit more in.
    let trimmed_newer = retain(newer, budget - keeper_cost, filter, estimator)?;

    if keeper_cost + cost_of(&trimmed_newer, estimator) <= budget {
        let mut kept = keepers;
        kept.extend(trimmed_newer);
        return Ok(kept);
    }

    Ok(keepers)
}
