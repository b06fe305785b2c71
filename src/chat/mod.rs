//! Chat application module for the health assistant.
//!
//! This module provides a REPL chat interface built on top of the
//! [`HealthClient`](crate::HealthClient). It supports:
//!
//! - An append-only conversation log opened by a welcome message
//! - A single in-flight question at a time, with a typing indicator
//! - Best-effort usage statistics refreshed after each answer
//! - Quick-question suggestions before the first question
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and backend interaction
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{
    BASE_URL_ENV, CONFIG_PATH_ENV, ChatArgs, ChatConfig, DEFAULT_QUICK_QUESTIONS,
    DEFAULT_WELCOME_MESSAGE, FileConfig,
};
pub use session::{APOLOGY_MESSAGE, ChatSession, SubmitOutcome};
