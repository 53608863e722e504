//! The suggestion pipeline: history in, streamed completion out.
//!
//! This is the glue a notebook magic drives. It owns no host state; the
//! history source, recall tables, buffer, and sink all come from the caller,
//! so the same pipeline serves kernels, tests, and headless embeddings.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::assist::generate::{next_cell_messages, suggestion_messages};
use crate::assist::prompts::PromptStore;
use crate::config::schema::Config;
use crate::context::builder::ContextBuilder;
use crate::context::filters::CellFilter;
use crate::context::message::{ConversationWindow, Message};
use crate::display::markdown::{MarkdownBuffer, Stage};
use crate::display::sink::DisplaySink;
use crate::errors::is_interrupt_kind;
use crate::providers::base::{CompletionClient, CompletionStream};
use crate::session::history::HistorySource;
use crate::session::recall::{ExceptionInfo, SessionRecall};
use crate::tokens::estimate::TokenEstimator;
use crate::tokens::trim::trim_to_fit;

/// One assist invocation.
#[derive(Debug, Clone)]
pub struct AssistRequest {
    /// The user's request text (the cell body).
    pub text: String,
    /// Skip prior history entirely.
    pub fresh: bool,
    /// Override the configured model for this request.
    pub model: Option<String>,
}

impl AssistRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fresh: false,
            model: None,
        }
    }

    pub fn fresh(mut self) -> Self {
        self.fresh = true;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Drives context assembly, trimming, generation, and display updates.
pub struct Assistant {
    client: Arc<dyn CompletionClient>,
    prompts: PromptStore,
    filter: CellFilter,
    estimator: TokenEstimator,
    model: String,
    context_turns: u64,
    stream: bool,
}

impl Assistant {
    pub fn new(client: Arc<dyn CompletionClient>, config: &Config) -> Self {
        Self {
            client,
            prompts: PromptStore::new(),
            filter: config.filters.cell_filter(),
            estimator: TokenEstimator::cl100k(),
            model: config.assist.model.clone(),
            context_turns: config.assist.context_turns,
            stream: config.assist.stream,
        }
    }

    /// Swap the token estimator. Tests use fixed-cost encoders.
    pub fn with_estimator(mut self, estimator: TokenEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn prompts_mut(&mut self) -> &mut PromptStore {
        &mut self.prompts
    }

    /// Generate the next cell for `request.text`.
    ///
    /// Unless the request is fresh, the last few turns of history are built
    /// into context and trimmed to the model's budget first. The suggestion
    /// streams into `buffer` fragment by fragment and is recorded in the
    /// recall table under the current turn once finished.
    ///
    /// The host is expected to have recorded the invoking cell as the
    /// current turn already (interactive shells do); context stops just
    /// before it.
    pub async fn next_cell(
        &self,
        request: &AssistRequest,
        history: &dyn HistorySource,
        recall: &SessionRecall,
        buffer: &mut MarkdownBuffer,
        sink: &dyn DisplaySink,
    ) -> Result<String> {
        let model = request.model.as_deref().unwrap_or(&self.model);
        let turn = history.current_index();
        let text = request.text.trim();

        buffer.set_stage(Stage::Starting);
        sink.create(buffer);

        let mut context = ConversationWindow::new();
        if !request.fresh {
            let full = ContextBuilder::new(history, recall, &self.filter).recent(self.context_turns);
            context = trim_to_fit(&full, model, None, &self.estimator)?;
            debug!(
                "assist context: {} of {} messages after trim",
                context.len(),
                full.len()
            );
        }

        let messages = next_cell_messages(&self.prompts, &context, text);

        buffer.set_stage(Stage::Generating);
        sink.update(buffer);

        let mut stream = self.completion_stream(model, &messages).await?;
        buffer.consume(&mut stream, sink).await;

        buffer.set_stage(Stage::Finished);
        sink.update(buffer);

        let suggestion = buffer.message().to_string();
        recall.record_assist(turn, suggestion.clone());
        Ok(suggestion)
    }

    /// Diagnose a host-captured exception.
    ///
    /// Interrupt and exit signals pass through undiagnosed. The error is
    /// recorded for future context either way; a successful diagnosis is
    /// recorded too, so follow-up context carries both the error and the
    /// advice. Any failure in the suggestion itself is reported as a
    /// secondary diagnostic so the host's own traceback display is never
    /// blocked.
    pub async fn on_exception(
        &self,
        turn: u64,
        code: Option<&str>,
        error: &ExceptionInfo,
        recall: &SessionRecall,
        buffer: &mut MarkdownBuffer,
        sink: &dyn DisplaySink,
    ) {
        if is_interrupt_kind(&error.kind) {
            return;
        }

        recall.record_error(turn, error);

        match self.diagnose(code, error, buffer, sink).await {
            Ok(()) => recall.record_assist(turn, buffer.message().to_string()),
            Err(e) => warn!("Error while trying to provide a suggestion: {}", e),
        }
    }

    async fn diagnose(
        &self,
        code: Option<&str>,
        error: &ExceptionInfo,
        buffer: &mut MarkdownBuffer,
        sink: &dyn DisplaySink,
    ) -> Result<()> {
        let messages = suggestion_messages(&self.prompts, code, error);

        buffer.set_stage(Stage::Generating);
        sink.create(buffer);

        let mut stream = self.completion_stream(&self.model, &messages).await?;
        buffer.consume(&mut stream, sink).await;

        buffer.set_stage(Stage::Finished);
        sink.update(buffer);
        Ok(())
    }

    async fn completion_stream(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<CompletionStream> {
        if self.stream {
            self.client.complete_stream(model, messages).await
        } else {
            let text = self.client.complete(model, messages).await?;
            Ok(CompletionStream::from_text(text))
        }
    }
}
