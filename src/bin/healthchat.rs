//! Interactive chat client for the public health assistant.
//!
//! This binary provides a REPL for asking health questions of a backend
//! that serves `/api/health/query` and `/api/health/stats`.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on localhost:8000
//! healthchat
//!
//! # Point at another backend
//! healthchat --base-url https://health.example.com
//!
//! # Read settings from a YAML file
//! healthchat --config ~/.healthchat.yaml
//!
//! # Disable colors (useful for piping output)
//! healthchat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/stats` - Show usage statistics
//! - `/suggest` and `/pick <n>` - Choose a suggested question
//! - `/history [n]` - Show stored questions for this session
//! - `//text` - Send a question that starts with `/`
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use healthchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use healthchat::{HealthClient, HistoryParams};

const PROMPT: &str = "You: ";

/// Main entry point for the healthchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("healthchat [OPTIONS]");
    let config = ChatConfig::from_args(args)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("error")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let client = HealthClient::with_options(Some(config.base_url.clone()), config.timeout)?;
    tracing::debug!(base_url = %client.base_url(), "starting session");

    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    let mut session = ChatSession::start(client, &config).await;

    println!("Public Health Assistant (backend: {})", config.base_url);
    println!("Type /help for commands, /quit to exit\n");
    renderer.print_stats(session.stats());
    println!();
    for message in session.messages() {
        renderer.print_message(message);
    }
    println!();
    renderer.print_quick_questions(session.quick_questions());

    loop {
        let readline = if session.input().is_empty() {
            rl.readline(PROMPT)
        } else {
            let initial = session.input().to_string();
            rl.readline_with_initial(PROMPT, (initial.as_str(), ""))
        };

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    session.set_input("");
                    continue;
                }
                session.set_input(line.as_str());
                let line = line.trim();

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    session.set_input("");
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Take care!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => {
                            renderer.print_stats(session.stats());
                        }
                        ChatCommand::Refresh => {
                            if session.refresh_stats().await {
                                renderer.print_stats(session.stats());
                            } else {
                                renderer.print_error("Could not refresh statistics.");
                            }
                        }
                        ChatCommand::Suggest => {
                            if session.quick_questions_offered() {
                                renderer.print_quick_questions(session.quick_questions());
                            } else {
                                renderer.print_info(
                                    "Suggestions are only offered before your first question.",
                                );
                            }
                        }
                        ChatCommand::Pick(n) => {
                            if !session.quick_questions_offered() {
                                renderer.print_info(
                                    "Suggestions are only offered before your first question.",
                                );
                            } else if session.select_quick_question(n - 1).is_none() {
                                renderer.print_error(&format!("No suggestion number {n}."));
                            }
                        }
                        ChatCommand::History(limit) => {
                            match session.history(HistoryParams::first(limit)).await {
                                Ok(page) => renderer.print_history(&page),
                                Err(err) => renderer
                                    .print_error(&format!("Failed to fetch history: {}", err)),
                            }
                        }
                        ChatCommand::Ping => match session.ping().await {
                            Ok(info) => renderer.print_info(&info.message),
                            Err(err) => {
                                renderer.print_error(&format!("Backend unreachable: {}", err))
                            }
                        },
                        ChatCommand::Session => {
                            renderer.print_info(&format!(
                                "Session {} ({} messages)",
                                session.session_id(),
                                session.message_count()
                            ));
                        }
                        ChatCommand::Log => {
                            for message in session.messages() {
                                renderer.print_message(message);
                            }
                        }
                        ChatCommand::Ask(question) => {
                            session.submit(&question, &mut renderer).await;
                            println!();
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the backend
                session.submit_input(&mut renderer).await;
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - discard the line
                session.set_input("");
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nTake care!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}
