//! Verb → handler registry and dispatch.

use crate::data::WindowId;
use crate::error::RegisterError;
use std::collections::HashMap;

/// Everything a handler gets to see about one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CommandData {
    /// Lower-cased verb
    pub verb: String,
    pub args: Vec<String>,
    pub target_window: WindowId,
    /// Sender display name
    pub owner: String,
    /// Raw input text, prefix included
    pub text: String,
    pub is_player: bool,
    pub is_host: bool,
}

/// What a handler reports back to the command set
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub success: bool,
    /// Whether the triggering input still goes into the window history
    pub echo: bool,
    pub output_message: Option<String>,
    /// Lifetime of the status message in seconds (window default when None)
    pub message_timeout: Option<f32>,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            echo: false,
            output_message: Some(output.into()),
            message_timeout: None,
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            echo: false,
            output_message: Some(output.into()),
            message_timeout: None,
        }
    }

    /// Handled, nothing to say
    pub fn silent() -> Self {
        Self {
            success: true,
            echo: false,
            output_message: None,
            message_timeout: None,
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_timeout(mut self, seconds: f32) -> Self {
        self.message_timeout = Some(seconds);
        self
    }
}

/// A single command implementation.
///
/// Side effects are the handler's own business; the registry never retries.
pub trait CommandHandler {
    fn handle(&mut self, data: &CommandData) -> CommandResult;
}

impl<F> CommandHandler for F
where
    F: FnMut(&CommandData) -> CommandResult,
{
    fn handle(&mut self, data: &CommandData) -> CommandResult {
        self(data)
    }
}

/// Maps verbs to handlers for one command set
pub struct CommandRegistry {
    owner: String,
    commands: HashMap<String, Box<dyn CommandHandler>>,
    /// Registration order, for help listings
    verbs: Vec<String>,
}

impl CommandRegistry {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            commands: HashMap::new(),
            verbs: Vec::new(),
        }
    }

    /// Register `handler` under `verb` (trimmed, lower-cased).
    ///
    /// Refused, with a warning, when the verb is empty or contains whitespace,
    /// or when the verb is already taken. The first registration stays active.
    pub fn register(
        &mut self,
        verb: &str,
        handler: impl CommandHandler + 'static,
    ) -> Result<(), RegisterError> {
        let verb = verb.trim().to_lowercase();

        if verb.is_empty() || verb.chars().any(char::is_whitespace) {
            tracing::warn!(
                "{} - command '{}' is invalid, a command cannot contain any whitespace",
                self.owner,
                verb
            );
            return Err(RegisterError::InvalidVerb(verb));
        }

        if self.commands.contains_key(&verb) {
            tracing::warn!("{} - command '{}' already registered", self.owner, verb);
            return Err(RegisterError::Duplicate(verb));
        }

        tracing::debug!("{} - registered command '{}'", self.owner, verb);
        self.commands.insert(verb.clone(), Box::new(handler));
        self.verbs.push(verb);
        Ok(())
    }

    /// Run the handler for `data.verb`.
    ///
    /// Unknown verbs produce a failed, echoed result naming the verb.
    pub fn dispatch(&mut self, data: &CommandData) -> CommandResult {
        let verb = data.verb.to_lowercase();
        match self.commands.get_mut(&verb) {
            Some(handler) => handler.handle(data),
            None => {
                tracing::debug!("{} - unknown command '{}'", self.owner, verb);
                CommandResult::failure(format!("Command \"{}\" not found!", data.verb))
                    .with_echo(true)
            }
        }
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.commands.contains_key(&verb.trim().to_lowercase())
    }

    pub fn verbs(&self) -> &[String] {
        &self.verbs
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
