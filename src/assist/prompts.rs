//! System proclamations for the two generation paths.

/// Default system prompt for next-cell generation.
pub const NEXT_CELL_PROCLAMATION: &str = "As a coding assistant, your task is to help users write code in Python within Jupyter Notebooks. Provide comments and code for the user to read and edit, ensuring it can be run successfully. The user will be able to run the code in the cell and see the output.";

/// Default system prompt for exception diagnosis.
pub const ERROR_DIAGNOSER_PROCLAMATION: &str = r#"As a coding assistant, you'll diagnose errors in Python code written in a Jupyter Notebook. Format your response using markdown. Making sure to include the language around code blocks, like

```python
# code
```

Provide concise code examples in your response which will be rendered in Markdown in the notebook. The user will not be able to respond to your response."#;

/// The system prompts in use, overridable at runtime.
///
/// Embedding hosts swap these to steer style or target language without
/// touching the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct PromptStore {
    next_cell: String,
    diagnoser: String,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self {
            next_cell: NEXT_CELL_PROCLAMATION.to_string(),
            diagnoser: ERROR_DIAGNOSER_PROCLAMATION.to_string(),
        }
    }
}

impl PromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_cell(&self) -> &str {
        &self.next_cell
    }

    pub fn diagnoser(&self) -> &str {
        &self.diagnoser
    }

    pub fn set_next_cell(&mut self, prompt: impl Into<String>) {
        self.next_cell = prompt.into();
    }

    pub fn set_diagnoser(&mut self, prompt: impl Into<String>) {
        self.diagnoser = prompt.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_the_proclamations() {
        let store = PromptStore::new();
        assert_eq!(store.next_cell(), NEXT_CELL_PROCLAMATION);
        assert_eq!(store.diagnoser(), ERROR_DIAGNOSER_PROCLAMATION);
    }

    #[test]
    fn test_overrides_stick() {
        let mut store = PromptStore::new();
        store.set_next_cell("Write Rust instead.");
        store.set_diagnoser("Explain the panic.");

        assert_eq!(store.next_cell(), "Write Rust instead.");
        assert_eq!(store.diagnoser(), "Explain the panic.");
    }

    #[test]
    fn test_diagnoser_mentions_code_fences() {
        // The prompt instructs the model to fence code blocks; keep that
        // instruction present whenever the default text is revised.
        assert!(ERROR_DIAGNOSER_PROCLAMATION.contains("```python"));
    }
}
