//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending a question
//! to the backend.

use crate::types::DEFAULT_HISTORY_LIMIT;

/// Largest history page the client will ask for.
const MAX_HISTORY_LIMIT: u32 = 100;

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display the usage statistics snapshot.
    Stats,

    /// Fetch fresh usage statistics.
    Refresh,

    /// List the quick-question suggestions.
    Suggest,

    /// Copy quick question `n` (1-based) into the input buffer.
    Pick(usize),

    /// Show stored history for this session, at most this many entries.
    History(u32),

    /// Check that the backend answers.
    Ping,

    /// Show the session identifier.
    Session,

    /// Re-render the whole conversation.
    Log,

    /// Send a question that itself starts with `/`, typed as `//...`.
    Ask(String),

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a question.  A leading `//`
/// escapes the slash: the line is sent with one `/` removed.
///
/// # Examples
///
/// ```
/// # use healthchat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
/// assert_eq!(parse_command("/pick 2"), Some(ChatCommand::Pick(2)));
/// assert!(parse_command("Is a fever of 38C dangerous?").is_none());
/// assert_eq!(
///     parse_command("//r/health says so"),
///     Some(ChatCommand::Ask("/r/health says so".to_string()))
/// );
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }
    if input.starts_with("//") {
        return Some(ChatCommand::Ask(input[1..].to_string()));
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" => ChatCommand::Stats,
        "refresh" => ChatCommand::Refresh,
        "suggest" | "suggestions" => ChatCommand::Suggest,
        "pick" => match argument {
            Some(arg) => match arg.parse::<usize>() {
                Ok(n) if n > 0 => ChatCommand::Pick(n),
                _ => ChatCommand::Invalid("/pick expects a suggestion number".to_string()),
            },
            None => ChatCommand::Invalid("/pick requires a suggestion number".to_string()),
        },
        "history" => match argument {
            Some(arg) => match arg.parse::<u32>() {
                Ok(n) if (1..=MAX_HISTORY_LIMIT).contains(&n) => ChatCommand::History(n),
                _ => ChatCommand::Invalid(format!(
                    "/history expects a count between 1 and {MAX_HISTORY_LIMIT}"
                )),
            },
            None => ChatCommand::History(DEFAULT_HISTORY_LIMIT),
        },
        "ping" => ChatCommand::Ping,
        "session" => ChatCommand::Session,
        "log" => ChatCommand::Log,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /stats                 Show usage statistics
  /refresh               Fetch fresh usage statistics
  /suggest               List suggested questions (before your first question)
  /pick <n>              Put suggestion n in the input line without sending it
  /history [n]           Show up to n stored questions for this session
  /ping                  Check that the backend is reachable
  /session               Show the session identifier
  /log                   Show the whole conversation again
  //text                 Send "/text" as a question
  /help                  Show this help message
  /quit                  Exit the chat
Anything else is sent as a question."#
}
