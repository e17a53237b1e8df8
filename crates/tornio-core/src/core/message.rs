//! Operator messages
//!
//! Provides:
//! - The info/error message level
//! - The `Messenger` interface consumed by the simulation engine and the CLI
//! - A messenger that forwards to `tracing`

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info};

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    /// Successful operation or progress report
    Info,
    /// User-visible failure
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Messaging interface
///
/// Implement this trait to receive operator notifications from the engine
/// and the command handlers.
pub trait Messenger {
    /// Show `text` to the operator
    fn notify(&self, text: &str, level: MessageLevel);

    /// Shorthand for an info notification
    fn info(&self, text: &str) {
        self.notify(text, MessageLevel::Info);
    }

    /// Shorthand for an error notification
    fn error(&self, text: &str) {
        self.notify(text, MessageLevel::Error);
    }
}

impl<M: Messenger + ?Sized> Messenger for &M {
    fn notify(&self, text: &str, level: MessageLevel) {
        (**self).notify(text, level);
    }
}

/// Messenger that writes every notification to the `tracing` log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMessenger;

impl Messenger for TracingMessenger {
    fn notify(&self, text: &str, level: MessageLevel) {
        match level {
            MessageLevel::Info => info!(target: "tornio::operator", "{}", text),
            MessageLevel::Error => error!(target: "tornio::operator", "{}", text),
        }
    }
}
