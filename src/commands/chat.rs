//! Chat window command set: `/invite` and `/help`.

use super::interpreter::CommandSet;
use super::registry::{CommandData, CommandHandler, CommandRegistry, CommandResult};
use crate::config::CommandsConfig;
use crate::lobby::{Lobby, LobbyPermissions};
use std::rc::Rc;

pub const CHAT_COMMANDS_NAME: &str = "Chat Commands";

pub struct ChatCommandSet {
    lobby: Rc<dyn Lobby>,
    settings: CommandsConfig,
}

impl ChatCommandSet {
    pub fn new(lobby: Rc<dyn Lobby>) -> Self {
        Self::with_settings(lobby, CommandsConfig::default())
    }

    pub fn with_settings(lobby: Rc<dyn Lobby>, settings: CommandsConfig) -> Self {
        Self { lobby, settings }
    }
}

impl CommandSet for ChatCommandSet {
    fn name(&self) -> &str {
        CHAT_COMMANDS_NAME
    }

    fn register_commands(&mut self, registry: &mut CommandRegistry) {
        let prefix = self.settings.prefix;
        let _ = registry.register(
            "invite",
            InviteCommand {
                lobby: Rc::clone(&self.lobby),
                prefix,
            },
        );

        let help = format!(
            "Commands: {p}invite <SteamID> - invite a friend to this game; {p}help - show this list. \
             Start a message with {p}{p} to send it as plain text.",
            p = prefix
        );
        let _ = registry.register("help", move |_: &CommandData| {
            CommandResult::success(help.clone()).with_echo(true)
        });
    }

    fn prefix(&self) -> char {
        self.settings.prefix
    }

    fn echo_if_failed_to_tokenize(&self) -> bool {
        self.settings.echo_if_failed_to_tokenize
    }

    fn send_error_if_failed_to_tokenize(&self) -> bool {
        self.settings.send_error_if_failed_to_tokenize
    }
}

/// `/invite <SteamID>`
struct InviteCommand {
    lobby: Rc<dyn Lobby>,
    prefix: char,
}

impl CommandHandler for InviteCommand {
    fn handle(&mut self, data: &CommandData) -> CommandResult {
        let Some((raw, id)) = data
            .args
            .first()
            .and_then(|arg| arg.parse::<u64>().ok().map(|id| (arg, id)))
        else {
            return CommandResult::failure(format!(
                "Error! Invalid argument, ID. Usage: \"{}invite <SteamID>\"",
                self.prefix
            ));
        };

        let shown = mask_id(raw);
        match self.lobby.permissions() {
            LobbyPermissions::Private => CommandResult::failure(format!(
                "Cannot send invite to {}! Lobby is set to PRIVATE.",
                shown
            )),
            LobbyPermissions::InviteOnly | LobbyPermissions::Open => {
                if self.lobby.is_full() {
                    CommandResult::failure(format!(
                        "Cannot send invite to {}! Lobby is full ({}/{})",
                        shown,
                        self.lobby.member_count(),
                        self.lobby.max_members()
                    ))
                } else if self.lobby.invite_friend(id) {
                    CommandResult::success(format!("Sent game invite to {}.", shown))
                } else {
                    CommandResult::failure(format!("Failed to send game invite to {}.", shown))
                }
            }
            LobbyPermissions::Unknown => CommandResult::failure(format!(
                "Cannot send invite to {}! Network permissions unknown.",
                shown
            )),
        }
    }
}

/// Replace all but the last four characters with `*`.
pub fn mask_id(id: &str) -> String {
    let len = id.chars().count();
    let hidden = len.saturating_sub(4);
    id.chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandInterpreter;
    use crate::data::{InputSource, MessageRequest, WindowId};
    use crate::lobby::StaticLobby;

    fn interpreter(lobby: Rc<StaticLobby>) -> CommandInterpreter {
        CommandInterpreter::new(Box::new(ChatCommandSet::new(lobby)))
    }

    fn run(interp: &mut CommandInterpreter, text: &str) -> (bool, Option<String>) {
        let req = MessageRequest::new(WindowId(1), InputSource(0), "Ann", text);
        let outcome = interp.run(&req, true);
        (outcome.echo, outcome.status_reply.map(|r| r.text))
    }

    #[test]
    fn test_mask_id() {
        assert_eq!(mask_id("123456789"), "*****6789");
        assert_eq!(mask_id("1234"), "1234");
        assert_eq!(mask_id("12"), "12");
        assert_eq!(mask_id(""), "");
    }

    #[test]
    fn test_invite_success() {
        let lobby = Rc::new(StaticLobby::new(LobbyPermissions::Open, 1, 4));
        let mut interp = interpreter(Rc::clone(&lobby));

        let (echo, reply) = run(&mut interp, "/invite 123456789");
        assert!(!echo);
        assert_eq!(reply.as_deref(), Some("Sent game invite to *****6789."));
        assert_eq!(lobby.invited(), vec![123456789]);
    }

    #[test]
    fn test_invite_argument_errors() {
        let lobby = Rc::new(StaticLobby::new(LobbyPermissions::Open, 1, 4));
        let mut interp = interpreter(Rc::clone(&lobby));

        let usage = Some("Error! Invalid argument, ID. Usage: \"/invite <SteamID>\"".to_string());
        assert_eq!(run(&mut interp, "/invite bob").1, usage);
        assert_eq!(run(&mut interp, "/invite").1, usage);
        assert!(lobby.invited().is_empty());
    }

    #[test]
    fn test_invite_lobby_states() {
        let private = Rc::new(StaticLobby::new(LobbyPermissions::Private, 1, 4));
        assert_eq!(
            run(&mut interpreter(private), "/invite 123456789").1.as_deref(),
            Some("Cannot send invite to *****6789! Lobby is set to PRIVATE.")
        );

        let full = Rc::new(StaticLobby::new(LobbyPermissions::InviteOnly, 4, 4));
        assert_eq!(
            run(&mut interpreter(full), "/invite 123456789").1.as_deref(),
            Some("Cannot send invite to *****6789! Lobby is full (4/4)")
        );

        let unknown = Rc::new(StaticLobby::new(LobbyPermissions::Unknown, 1, 4));
        assert_eq!(
            run(&mut interpreter(unknown), "/invite 123456789").1.as_deref(),
            Some("Cannot send invite to *****6789! Network permissions unknown.")
        );

        let mut refusing = StaticLobby::new(LobbyPermissions::Open, 1, 4);
        refusing.reject_invites = true;
        assert_eq!(
            run(&mut interpreter(Rc::new(refusing)), "/invite 123456789").1.as_deref(),
            Some("Failed to send game invite to *****6789.")
        );
    }

    #[test]
    fn test_help_is_echoed() {
        let lobby = Rc::new(StaticLobby::new(LobbyPermissions::Open, 1, 4));
        let mut interp = interpreter(lobby);
        let (echo, reply) = run(&mut interp, "/HELP");
        assert!(echo);
        assert!(reply.unwrap().contains("/invite <SteamID>"));
        assert_eq!(interp.registry().verbs(), &["invite".to_string(), "help".to_string()]);
    }

    #[test]
    fn test_configured_prefix() {
        let lobby = Rc::new(StaticLobby::new(LobbyPermissions::Open, 1, 4));
        let settings = CommandsConfig {
            prefix: '!',
            ..CommandsConfig::default()
        };
        let mut interp = CommandInterpreter::new(Box::new(ChatCommandSet::with_settings(lobby, settings)));

        let (echo, reply) = run(&mut interp, "/invite 1");
        assert!(echo);
        assert!(reply.is_none());

        let (_, reply) = run(&mut interp, "!invite x");
        assert_eq!(
            reply.as_deref(),
            Some("Error! Invalid argument, ID. Usage: \"!invite <SteamID>\"")
        );
    }
}
