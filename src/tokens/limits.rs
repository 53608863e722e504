//! Maximum context budgets per model.

use crate::errors::TokenError;

/// Context-window budgets, in tokens, for the supported chat models.
///
/// Values come from the provider's published limits and must stay exact per
/// model name; an unrecognised model is a hard error, never a default.
pub const MAX_TOKENS: &[(&str, usize)] = &[
    ("gpt-3.5-turbo-0301", 2048),
    ("gpt-3.5-turbo", 2048),
    ("gpt-4", 8192),
    ("gpt-4-0314", 8192),
];

/// Look up the context budget for a model.
pub fn context_limit(model: &str) -> Result<usize, TokenError> {
    MAX_TOKENS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, limit)| *limit)
        .ok_or_else(|| TokenError::UnknownContextLimit(model.to_string()))
}
