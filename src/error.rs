//! Error types for the console toolkit.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Command line syntax errors (bad escapes, etc.)
    #[error("{message}")]
    Parse {
        /// Character offset of the offending sequence.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// No registered command has the requested name.
    #[error("command \"{0}\" not found")]
    CommandNotFound(String),

    /// The command line contained no words.
    #[error("empty command")]
    EmptyCommand,

    /// The registry contains no commands at all.
    #[error("no commands are configured")]
    NoCommands,

    /// A command body failed.
    #[error("{0}")]
    Execution(String),

    /// Cooperative cancellation was requested and observed.
    #[error("interrupted")]
    Interrupted,

    /// A lifecycle operation was invoked in the wrong state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Configuration errors (invalid config file, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors on session streams or the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Creates a parse error at the given character offset.
    pub fn parse(offset: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: msg.into(),
        }
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates an invalid-state error with the given message.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if this error is the cooperative cancellation signal.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "Syntax Error",
            Self::CommandNotFound(_) | Self::EmptyCommand | Self::NoCommands => "Lookup Error",
            Self::Execution(_) => "Execution Error",
            Self::Interrupted => "Interrupted",
            Self::InvalidState(_) => "Invalid State",
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
        }
    }
}

/// Result type alias using ConsoleError.
pub type Result<T> = std::result::Result<T, ConsoleError>;
