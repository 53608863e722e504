//! Message assembly for the completion API.

use crate::assist::prompts::PromptStore;
use crate::context::message::{ConversationWindow, Message};
use crate::session::recall::ExceptionInfo;

/// Error reports longer than this are cut so one pathological traceback
/// cannot eat the whole token budget.
pub const ERROR_REPORT_LIMIT: usize = 1024;

/// Messages for generating the next cell: proclamation, prior context,
/// then the user's new request.
pub fn next_cell_messages(
    prompts: &PromptStore,
    context: &ConversationWindow,
    text: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(context.len() + 2);
    messages.push(Message::system(prompts.next_cell()));
    messages.extend(context.messages().iter().cloned());
    messages.push(Message::user(text));
    messages
}

/// Messages for diagnosing an exception: proclamation, the offending code
/// when the host captured it, then the error report as a system turn.
pub fn suggestion_messages(
    prompts: &PromptStore,
    code: Option<&str>,
    error: &ExceptionInfo,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(3);
    messages.push(Message::system(prompts.diagnoser()));
    if let Some(code) = code {
        messages.push(Message::user(code));
    }
    messages.push(Message::system(error_report(error)));
    messages
}

/// The full `"{kind}: {message}\n{trace}"` report, truncated at
/// `ERROR_REPORT_LIMIT` characters with an ellipsis marker when longer.
pub fn error_report(error: &ExceptionInfo) -> String {
    let report = error.report();
    if report.chars().count() > ERROR_REPORT_LIMIT {
        let cut: String = report.chars().take(ERROR_REPORT_LIMIT).collect();
        format!("{cut}\n...")
    } else {
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::message::Role;

    #[test]
    fn test_next_cell_messages_shape() {
        let prompts = PromptStore::new();
        let context = ConversationWindow::from(vec![
            Message::user("import pandas as pd"),
            Message::user("df = pd.read_csv(\"pokemon.csv\")"),
        ]);

        let messages = next_cell_messages(&prompts, &context, "# plot hp against speed");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, prompts.next_cell());
        assert_eq!(messages[1].content, "import pandas as pd");
        assert_eq!(messages[2].content, "df = pd.read_csv(\"pokemon.csv\")");
        assert_eq!(messages[3].role, Role::User);
        assert_eq!(messages[3].content, "# plot hp against speed");
    }

    #[test]
    fn test_next_cell_messages_with_empty_context() {
        let prompts = PromptStore::new();
        let messages = next_cell_messages(&prompts, &ConversationWindow::new(), "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_suggestion_messages_with_code() {
        let prompts = PromptStore::new();
        let error = ExceptionInfo::new("Exception", "this is just a test");
        let messages = suggestion_messages(&prompts, Some("fancy code"), &error);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, prompts.diagnoser());
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "fancy code");
        assert_eq!(messages[2].role, Role::System);
        assert!(messages[2].content.starts_with("Exception: this is just a test"));
    }

    #[test]
    fn test_suggestion_messages_without_code() {
        let prompts = PromptStore::new();
        let error = ExceptionInfo::new("NameError", "name 'df' is not defined");
        let messages = suggestion_messages(&prompts, None, &error);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::System);
        assert_eq!(messages[1].content, "NameError: name 'df' is not defined");
    }

    #[test]
    fn test_error_report_includes_frames() {
        let error = ExceptionInfo::new("ZeroDivisionError", "division by zero")
            .with_frames(vec!["  File \"<cell>\", line 1".into()]);
        assert_eq!(
            error_report(&error),
            "ZeroDivisionError: division by zero\n  File \"<cell>\", line 1"
        );
    }

    #[test]
    fn test_error_report_truncates_long_tracebacks() {
        let error = ExceptionInfo::new("Exception", "a".repeat(2000));
        let report = error_report(&error);

        // Limit plus the newlined ellipsis.
        assert_eq!(report.chars().count(), ERROR_REPORT_LIMIT + 4);
        assert!(report.starts_with("Exception: aaaaaaaaaa"));
        assert!(report.ends_with("\n..."));
    }

    #[test]
    fn test_error_report_at_the_limit_is_untouched() {
        // "Exception: " is 11 chars; pad the message to land exactly on it.
        let error = ExceptionInfo::new("Exception", "a".repeat(ERROR_REPORT_LIMIT - 11));
        let report = error_report(&error);
        assert_eq!(report.chars().count(), ERROR_REPORT_LIMIT);
        assert!(!report.ends_with("..."));
    }
}
