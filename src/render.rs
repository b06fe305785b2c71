//! Output rendering for the chat session.
//!
//! This module provides the renderer trait the session drives and a
//! plain-text implementation for terminals.

use std::io::{self, Write};

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::types::{HistoryPage, Message, Role, StatsSnapshot};

/// ANSI escape code for dim text (used for the typing indicator and timestamps).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for speaker labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the user label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the assistant label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for yellow text (used for stale statistics).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code to clear the current line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Label printed while a question is in flight.
const TYPING_LABEL: &str = "Health Assistant is typing...";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Recording renderers in tests
pub trait Renderer: Send {
    /// Print one message from the conversation log.
    ///
    /// Content is plain text; line breaks in the content are preserved.
    fn print_message(&mut self, message: &Message);

    /// Show the transient indicator that an answer is on its way.
    fn start_typing(&mut self);

    /// Remove the typing indicator.
    fn finish_typing(&mut self);

    /// Print the usage statistics snapshot.
    fn print_stats(&mut self, snapshot: &StatsSnapshot);

    /// Print the numbered quick-question suggestions.
    fn print_quick_questions(&mut self, questions: &[String]);

    /// Print a page of backend history.
    fn print_history(&mut self, page: &HistoryPage);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
///
/// Conversation output goes to `out` (stdout by default) and errors to
/// `err` (stderr by default).  `out` is flushed before anything is written
/// to `err` so the two streams interleave in order on a terminal.
pub struct PlainTextRenderer {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    use_color: bool,
    typing: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writers(Box::new(io::stdout()), Box::new(io::stderr()), use_color)
    }

    /// Creates a renderer over arbitrary output and error streams.
    pub fn with_writers(
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
        use_color: bool,
    ) -> Self {
        Self {
            out,
            err,
            use_color,
            typing: false,
        }
    }

    /// Flushes the output stream to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.out.flush();
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn style(&self, code: &'static str) -> &'static str {
        if self.use_color { code } else { "" }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        self.finish_typing();
        let text = format_message(message, self.use_color);
        self.line(&text);
        self.flush();
    }

    fn start_typing(&mut self) {
        if self.typing {
            return;
        }
        self.typing = true;
        let (dim, reset) = (self.style(ANSI_DIM), self.style(ANSI_RESET));
        let _ = write!(self.out, "{dim}{TYPING_LABEL}{reset}");
        if !self.use_color {
            self.line("");
        }
        self.flush();
    }

    fn finish_typing(&mut self) {
        if !self.typing {
            return;
        }
        self.typing = false;
        if self.use_color {
            let _ = write!(self.out, "{ANSI_CLEAR_LINE}");
        }
        self.flush();
    }

    fn print_stats(&mut self, snapshot: &StatsSnapshot) {
        self.finish_typing();
        let text = format_stats(snapshot, self.use_color);
        self.line(&text);
        self.flush();
    }

    fn print_quick_questions(&mut self, questions: &[String]) {
        if questions.is_empty() {
            return;
        }
        self.line("Try asking (use /pick <n>):");
        for (idx, question) in questions.iter().enumerate() {
            self.line(&format!("  {}. {}", idx + 1, question));
        }
        self.flush();
    }

    fn print_history(&mut self, page: &HistoryPage) {
        if page.messages.is_empty() {
            self.line("No stored questions for this session.");
            self.flush();
            return;
        }
        self.line(&format!(
            "Showing {} of {} stored questions:",
            page.messages.len(),
            page.total
        ));
        let (dim, reset) = (self.style(ANSI_DIM), self.style(ANSI_RESET));
        for entry in &page.messages {
            self.line(&format!(
                "{dim}[{}]{reset} {}",
                format_time(entry.timestamp),
                entry.question
            ));
            for line in entry.answer.lines() {
                self.line(&format!("    {line}"));
            }
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.finish_typing();
        self.flush();
        let _ = writeln!(self.err, "Error: {error}");
        let _ = self.err.flush();
    }

    fn print_info(&mut self, info: &str) {
        self.finish_typing();
        self.line(info);
        self.flush();
    }
}

/// Speaker label shown before a message.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Bot => "Health Assistant",
    }
}

/// Render a message as a labelled, line-broken block.
pub fn format_message(message: &Message, use_color: bool) -> String {
    let (label_color, bold, dim, reset) = if use_color {
        let color = match message.role {
            Role::User => ANSI_CYAN,
            Role::Bot => ANSI_GREEN,
        };
        (color, ANSI_BOLD, ANSI_DIM, ANSI_RESET)
    } else {
        ("", "", "", "")
    };
    let mut out = format!(
        "{bold}{label_color}{}{reset} {dim}{}{reset}",
        role_label(message.role),
        format_time(message.timestamp)
    );
    for line in message.lines() {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

/// Render the statistics snapshot on one line.
pub fn format_stats(snapshot: &StatsSnapshot, use_color: bool) -> String {
    let stats = snapshot.stats();
    let mut out = format!(
        "Total queries: {} | Unique users: {} | Last 24h: {}",
        stats.total_queries, stats.unique_users, stats.recent_queries_24h
    );
    if snapshot.is_stale() {
        if use_color {
            out.push_str(&format!(" {ANSI_YELLOW}(stale){ANSI_RESET}"));
        } else {
            out.push_str(" (stale)");
        }
    }
    out
}

/// `HH:MM UTC`; every timestamp is shown in UTC whatever its offset.
fn format_time(timestamp: OffsetDateTime) -> String {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(format_description!("[hour]:[minute] UTC"))
        .unwrap_or_default()
}
