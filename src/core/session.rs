//! Session role - who is allowed to mutate window state.

use crate::data::InputSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMode {
    /// Authoritative: drains queues and owns windows
    #[default]
    Host,
    /// Displays replicated state and forwards its requests to the host
    Client,
}

/// The local participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub mode: NetworkMode,
    pub local_source: InputSource,
    pub player_name: String,
}

impl Session {
    pub fn new(mode: NetworkMode, local_source: InputSource, player_name: impl Into<String>) -> Self {
        Self {
            mode,
            local_source,
            player_name: player_name.into(),
        }
    }

    pub fn host(local_source: InputSource, player_name: impl Into<String>) -> Self {
        Self::new(NetworkMode::Host, local_source, player_name)
    }

    pub fn client(local_source: InputSource, player_name: impl Into<String>) -> Self {
        Self::new(NetworkMode::Client, local_source, player_name)
    }

    pub fn is_host(&self) -> bool {
        self.mode == NetworkMode::Host
    }

    /// Whether `source` is the host's own player
    pub fn is_host_player(&self, source: InputSource) -> bool {
        self.is_host() && source == self.local_source
    }
}
