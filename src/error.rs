//! Error types for the chat core.
//!
//! None of these are fatal: every failure path logs and drops the offending
//! request or registration, and the rest of the facility keeps running.

use crate::data::WindowId;
use thiserror::Error;

/// Malformed command text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("input does not start with the command prefix '{0}'")]
    MissingPrefix(char),

    #[error("command name is empty")]
    EmptyVerb,

    #[error("unterminated quoted argument")]
    UnterminatedQuote,
}

/// Refused command registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("command '{0}' is invalid; a command cannot be empty or contain whitespace")]
    InvalidVerb(String),

    #[error("command '{0}' is already registered")]
    Duplicate(String),
}

/// Window lookup and creation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("window namespace cannot be empty")]
    EmptyNamespace,

    #[error("window name cannot be empty")]
    EmptyName,

    #[error("window with ID {0} does not exist")]
    UnknownWindow(WindowId),

    #[error("window '{name}' ({id}) already exists, use a different window name")]
    DuplicateWindow { id: WindowId, name: String },
}
