//! Command sets and the interpreter that runs them.
//!
//! A [`CommandSet`] describes a family of commands (its name, prefix policy and
//! which verbs it registers). The window manager wraps each bound set in a
//! [`CommandInterpreter`], which owns the registry and routes message text
//! through it.

use super::registry::{CommandData, CommandRegistry};
use super::tokenizer::{self, DEFAULT_PREFIX};
use crate::data::{InputSource, MessageRequest};

/// A pluggable per-window command family
pub trait CommandSet {
    /// Shown as the sender of status replies
    fn name(&self) -> &str;

    /// Populate `registry`. Called exactly once, when the window is created.
    fn register_commands(&mut self, registry: &mut CommandRegistry);

    fn prefix(&self) -> char {
        DEFAULT_PREFIX
    }

    fn echo_if_failed_to_tokenize(&self) -> bool {
        true
    }

    fn send_error_if_failed_to_tokenize(&self) -> bool {
        true
    }
}

/// Outcome of the most recent `run`, for observability only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandStatus {
    #[default]
    Idle,
    Success,
    PassThrough,
    Escaped,
    FailedToTokenize,
    FailedToHandle,
}

/// What the window manager should do with the triggering request
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub echo: bool,
    /// Replacement text for the echoed request
    pub rewritten_text: Option<String>,
    /// Status message to append after the echo
    pub status_reply: Option<MessageRequest>,
}

impl RunOutcome {
    pub fn pass_through() -> Self {
        Self {
            echo: true,
            rewritten_text: None,
            status_reply: None,
        }
    }
}

pub struct CommandInterpreter {
    set: Box<dyn CommandSet>,
    registry: CommandRegistry,
    last_status: CommandStatus,
}

impl CommandInterpreter {
    pub fn new(mut set: Box<dyn CommandSet>) -> Self {
        let mut registry = CommandRegistry::new(set.name());
        set.register_commands(&mut registry);
        tracing::debug!(
            "Command set '{}' initialised with {} command(s)",
            set.name(),
            registry.len()
        );

        Self {
            set,
            registry,
            last_status: CommandStatus::Idle,
        }
    }

    pub fn name(&self) -> &str {
        self.set.name()
    }

    pub fn last_status(&self) -> CommandStatus {
        self.last_status
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Route one message request through the command set.
    ///
    /// `is_host` tells handlers whether the sender is the host's own player.
    pub fn run(&mut self, request: &MessageRequest, is_host: bool) -> RunOutcome {
        let prefix = self.set.prefix();
        let text = request.text.as_str();

        if !text.starts_with(prefix) {
            self.last_status = CommandStatus::PassThrough;
            return RunOutcome::pass_through();
        }

        if tokenizer::is_escaped(text, prefix) {
            self.last_status = CommandStatus::Escaped;
            return RunOutcome {
                echo: true,
                rewritten_text: Some(text[prefix.len_utf8()..].to_string()),
                status_reply: None,
            };
        }

        let invocation = match tokenizer::tokenize(text, prefix) {
            Ok(invocation) => invocation,
            Err(e) => {
                self.last_status = CommandStatus::FailedToTokenize;
                tracing::error!("{} - failed to parse '{}': {}", self.set.name(), text, e);
                let status_reply = self
                    .set
                    .send_error_if_failed_to_tokenize()
                    .then(|| self.status_message(request, format!("Error! {}.", capitalize(&e.to_string())), None));
                return RunOutcome {
                    echo: self.set.echo_if_failed_to_tokenize(),
                    rewritten_text: None,
                    status_reply,
                };
            }
        };

        let data = CommandData {
            verb: invocation.verb,
            args: invocation.args,
            target_window: request.target_window,
            owner: request.owner.clone(),
            text: request.text.clone(),
            is_player: request.is_player_message(),
            is_host,
        };
        let result = self.registry.dispatch(&data);

        self.last_status = if result.success {
            CommandStatus::Success
        } else {
            CommandStatus::FailedToHandle
        };

        let status_reply = result
            .output_message
            .filter(|output| !output.is_empty())
            .map(|output| self.status_message(request, output, result.message_timeout));

        RunOutcome {
            echo: result.echo,
            rewritten_text: None,
            status_reply,
        }
    }

    fn status_message(&self, request: &MessageRequest, text: String, timeout: Option<f32>) -> MessageRequest {
        MessageRequest {
            target_window: request.target_window,
            input_source: InputSource::SYSTEM,
            owner: self.set.name().to_string(),
            text,
            color_override: None,
            timeout_override: timeout,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
