//! Game lobby collaborator used by the `/invite` command.
//!
//! The platform lobby (member counts, join permissions, friend invites) lives
//! outside the chat core. Commands talk to it through [`Lobby`].

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Who may join the current game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LobbyPermissions {
    Private,
    InviteOnly,
    #[default]
    Open,
    Unknown,
}

pub trait Lobby {
    fn permissions(&self) -> LobbyPermissions;
    fn member_count(&self) -> usize;
    fn max_members(&self) -> usize;

    /// Send a platform invite. Returns false if the platform refused it.
    fn invite_friend(&self, id: u64) -> bool;

    fn is_full(&self) -> bool {
        self.member_count() >= self.max_members()
    }
}

/// Fixed-shape lobby for offline sessions and tests
#[derive(Debug, Default)]
pub struct StaticLobby {
    pub permissions: LobbyPermissions,
    pub member_count: usize,
    pub max_members: usize,
    /// Refuse every invite (simulates a platform error)
    pub reject_invites: bool,
    invited: RefCell<Vec<u64>>,
}

impl StaticLobby {
    pub fn new(permissions: LobbyPermissions, member_count: usize, max_members: usize) -> Self {
        Self {
            permissions,
            member_count,
            max_members,
            reject_invites: false,
            invited: RefCell::new(Vec::new()),
        }
    }

    /// IDs that were successfully invited, in order
    pub fn invited(&self) -> Vec<u64> {
        self.invited.borrow().clone()
    }
}

impl Lobby for StaticLobby {
    fn permissions(&self) -> LobbyPermissions {
        self.permissions
    }

    fn member_count(&self) -> usize {
        self.member_count
    }

    fn max_members(&self) -> usize {
        self.max_members
    }

    fn invite_friend(&self, id: u64) -> bool {
        if self.reject_invites {
            return false;
        }
        tracing::info!("Invite sent to {}", id);
        self.invited.borrow_mut().push(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lobby_records_invites() {
        let lobby = StaticLobby::new(LobbyPermissions::Open, 1, 4);
        assert!(!lobby.is_full());
        assert!(lobby.invite_friend(42));
        assert!(lobby.invite_friend(7));
        assert_eq!(lobby.invited(), vec![42, 7]);
    }

    #[test]
    fn test_rejecting_lobby() {
        let mut lobby = StaticLobby::new(LobbyPermissions::Open, 4, 4);
        lobby.reject_invites = true;
        assert!(lobby.is_full());
        assert!(!lobby.invite_friend(42));
        assert!(lobby.invited().is_empty());
    }

    #[test]
    fn test_permissions_parse_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            permissions: LobbyPermissions,
        }
        let w: Wrapper = toml::from_str("permissions = \"invite_only\"").unwrap();
        assert_eq!(w.permissions, LobbyPermissions::InviteOnly);
    }
}
