//! Token cost estimation for chat messages.
//!
//! Mirrors the provider's published framing rules for the chat-completion
//! family: every message carries a fixed overhead around its encoded fields,
//! a sender name discounts the role token, and every reply is primed with an
//! assistant header. Models outside the known family are rejected rather
//! than priced by guesswork.

use std::sync::Arc;

use crate::context::message::Message;
use crate::errors::TokenError;
use crate::tokens::encoder::{Cl100kEncoder, TokenEncoder};

/// Every message follows `<im_start>{role/name}\n{content}<im_end>\n`.
pub const MESSAGE_OVERHEAD: usize = 4;

/// Every reply is primed with `<im_start>assistant`.
pub const REPLY_PRIMING: usize = 2;

/// If there's a name, the role is omitted; the role is always required and
/// always one token.
const NAME_DISCOUNT: usize = 1;

/// Returns `Ok` only for models whose framing rules are implemented here.
pub fn ensure_chat_model(model: &str) -> Result<(), TokenError> {
    match model {
        "gpt-3.5-turbo-0301" | "gpt-3.5-turbo" | "gpt-4" | "gpt-4-0314" => Ok(()),
        _ => Err(TokenError::UnsupportedModel(model.to_string())),
    }
}

/// Prices messages with a pluggable encoder.
#[derive(Clone)]
pub struct TokenEstimator {
    encoder: Arc<dyn TokenEncoder>,
}

impl TokenEstimator {
    pub fn new(encoder: Arc<dyn TokenEncoder>) -> Self {
        Self { encoder }
    }

    /// Estimator backed by the real `cl100k_base` tokenizer.
    pub fn cl100k() -> Self {
        Self::new(Arc::new(Cl100kEncoder))
    }

    /// Cost of one message: framing overhead plus the encoded length of
    /// every field. Additive, so window costs can be maintained
    /// incrementally.
    pub fn message_tokens(&self, message: &Message) -> usize {
        let mut tokens = MESSAGE_OVERHEAD;
        tokens += self.encoder.count(message.role.as_str());
        tokens += self.encoder.count(&message.content);
        if let Some(name) = &message.name {
            tokens += self.encoder.count(name);
            tokens -= NAME_DISCOUNT;
        }
        tokens
    }

    /// Total cost of a window as the completion API will account it,
    /// including the reply priming.
    pub fn window_tokens(&self, messages: &[Message], model: &str) -> Result<usize, TokenError> {
        ensure_chat_model(model)?;
        let total: usize = messages.iter().map(|m| self.message_tokens(m)).sum();
        Ok(total + REPLY_PRIMING)
    }
}
