//! Command language: tokenizer, verb registry and per-window command sets.

pub mod chat;
pub mod interpreter;
pub mod registry;
pub mod tokenizer;

pub use chat::ChatCommandSet;
pub use interpreter::{CommandInterpreter, CommandSet, CommandStatus, RunOutcome};
pub use registry::{CommandData, CommandHandler, CommandRegistry, CommandResult};
pub use tokenizer::{tokenize, Invocation, DEFAULT_PREFIX};
