//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, an optional YAML
//! config file, and the resolved configuration the session runs with.
//! Values are taken from flags first, then the config file, then the
//! environment, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_BASE_URL;
use crate::error::{Error, Result};

/// Environment variable consulted for the config file path.
pub const CONFIG_PATH_ENV: &str = "HEALTHCHAT_CONFIG";

/// Environment variable consulted for the backend base URL.
pub const BASE_URL_ENV: &str = "HEALTHCHAT_BACKEND_URL";

/// Message that opens every conversation.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hello! I'm your AI Health Assistant.\n\
I can share general information about symptoms, disease prevention, healthy living, \
and when to seek medical care.\n\
I don't replace a doctor: for diagnosis or treatment, please consult a healthcare professional.";

/// Suggestions offered before the first question.
pub const DEFAULT_QUICK_QUESTIONS: &[&str] = &[
    "What are the symptoms of flu?",
    "How can I prevent heart disease?",
    "What should a balanced diet include?",
    "How much sleep do adults need?",
    "When should I see a doctor for a fever?",
];

/// Command-line arguments for the healthchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend base URL (default: http://localhost:8000)", "URL")]
    pub base_url: Option<String>,

    /// Path to a YAML config file.
    #[arrrg(optional, "YAML config file", "PATH")]
    pub config: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log outbound calls at debug level.
    #[arrrg(flag, "Enable debug logging on stderr")]
    pub debug: bool,
}

/// Contents of the optional YAML config file.
///
/// ```yaml
/// base_url: "https://health.example.com"
/// timeout_secs: 30
/// quick_questions:
///   - "What are the symptoms of flu?"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Backend base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Replacement welcome message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,

    /// Replacement quick-question suggestions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_questions: Option<Vec<String>>,
}

impl FileConfig {
    /// Load a config file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::io(format!("failed to read config {}", path.display()), err)
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a config from YAML text.  An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments, the config file and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Backend base URL; endpoints live under its `/api` prefix.
    pub base_url: String,

    /// Optional per-request timeout.  `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log at debug level.
    pub debug: bool,

    /// The message that opens every conversation.
    pub welcome_message: String,

    /// Suggestions offered before the first question.
    pub quick_questions: Vec<String>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: http://localhost:8000
    /// - Timeout: none
    /// - Color: enabled
    /// - Debug: disabled
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            use_color: true,
            debug: false,
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            quick_questions: DEFAULT_QUICK_QUESTIONS
                .iter()
                .map(|q| q.to_string())
                .collect(),
        }
    }

    /// Resolve the configuration from arguments and the process environment.
    pub fn from_args(args: ChatArgs) -> Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve the configuration using `env` to look up variables.
    pub fn resolve<F>(args: ChatArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = args
            .config
            .clone()
            .or_else(|| env(CONFIG_PATH_ENV))
            .map(PathBuf::from);
        let file = match config_path {
            Some(path) => FileConfig::from_file(&path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file, env)
    }

    /// Merge arguments over an already-loaded file config.
    pub fn merge<F>(args: ChatArgs, file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new();
        let base_url = args
            .base_url
            .or(file.base_url)
            .or_else(|| env(BASE_URL_ENV))
            .unwrap_or(defaults.base_url);
        let timeout_secs = args.timeout_secs.or(file.timeout_secs);
        if timeout_secs == Some(0) {
            return Err(Error::validation(
                "timeout must be at least one second",
                Some("timeout_secs".to_string()),
            ));
        }
        let quick_questions = match file.quick_questions {
            Some(questions) => {
                let questions: Vec<String> = questions
                    .into_iter()
                    .map(|q| q.trim().to_string())
                    .filter(|q| !q.is_empty())
                    .collect();
                if questions.is_empty() {
                    return Err(Error::config("quick_questions lists no questions"));
                }
                questions
            }
            None => defaults.quick_questions,
        };
        Ok(Self {
            base_url,
            timeout: timeout_secs.map(Duration::from_secs),
            use_color: !args.no_color,
            debug: args.debug,
            welcome_message: file.welcome_message.unwrap_or(defaults.welcome_message),
            quick_questions,
        })
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the welcome message.
    pub fn with_welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = message.into();
        self
    }

    /// Sets the quick-question suggestions.
    pub fn with_quick_questions(mut self, questions: Vec<String>) -> Self {
        self.quick_questions = questions;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}
