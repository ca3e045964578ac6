//! Configuration loader/writer plus strongly typed settings structures.
//!
//! One TOML file (`config.toml`) in the data directory. The shipped defaults
//! are embedded at compile time and written out on first run.

use crate::core::NetworkMode;
use crate::data::{InputSource, NewWindowRequest};
use crate::lobby::{LobbyPermissions, StaticLobby};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Embed default configuration file at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "WINDOWED_CHAT_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub lobby: LobbyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub mode: NetworkMode,
    #[serde(default = "default_player_name")]
    pub player_name: String,
    #[serde(default)]
    pub input_source: i32,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_prefix")]
    pub prefix: char,
    #[serde(default = "default_true")]
    pub echo_if_failed_to_tokenize: bool,
    #[serde(default = "default_true")]
    pub send_error_if_failed_to_tokenize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_window_name")]
    pub window_name: String,
    #[serde(default = "default_true")]
    pub hide_name: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default = "default_max_message_count")]
    pub max_message_count: usize,
    #[serde(default = "default_message_timeout")]
    pub message_timeout: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyConfig {
    #[serde(default)]
    pub permissions: LobbyPermissions,
    #[serde(default = "default_member_count")]
    pub member_count: usize,
    #[serde(default = "default_max_members")]
    pub max_members: usize,
}

fn default_player_name() -> String {
    "Player".to_string()
}

fn default_tick_rate() -> u32 {
    20
}

fn default_prefix() -> char {
    crate::commands::DEFAULT_PREFIX
}

fn default_true() -> bool {
    true
}

fn default_namespace() -> String {
    "windowed-chat".to_string()
}

fn default_window_name() -> String {
    "Chat".to_string()
}

fn default_max_message_count() -> usize {
    50
}

fn default_message_timeout() -> f32 {
    5.0
}

fn default_member_count() -> usize {
    1
}

fn default_max_members() -> usize {
    4
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: NetworkMode::Host,
            player_name: default_player_name(),
            input_source: 0,
            tick_rate_hz: default_tick_rate(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            echo_if_failed_to_tokenize: true,
            send_error_if_failed_to_tokenize: true,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            window_name: default_window_name(),
            hide_name: true,
            read_only: false,
            max_message_count: default_max_message_count(),
            message_timeout: default_message_timeout(),
        }
    }
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            permissions: LobbyPermissions::Open,
            member_count: default_member_count(),
            max_members: default_max_members(),
        }
    }
}

impl SessionConfig {
    pub fn input_source(&self) -> InputSource {
        InputSource(self.input_source)
    }
}

impl ChatConfig {
    /// Creation request for the chat window (command set bound by the caller)
    pub fn window_request(&self) -> NewWindowRequest {
        NewWindowRequest::new(self.namespace.clone(), self.window_name.clone())
            .hide_name(self.hide_name)
            .read_only(self.read_only)
            .max_message_count(self.max_message_count)
            .message_timeout(self.message_timeout)
    }
}

impl LobbyConfig {
    pub fn to_lobby(&self) -> StaticLobby {
        StaticLobby::new(self.permissions, self.member_count, self.max_members)
    }
}

impl Config {
    /// Load config.toml from the data directory, writing the defaults first if
    /// the file does not exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write default config to {}", path.display()))?;
            tracing::info!("Wrote default config to {}", path.display());
        }
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    pub fn validate(&self) -> Result<()> {
        let prefix = self.commands.prefix;
        if prefix.is_whitespace() || prefix == '"' {
            bail!("commands.prefix cannot be whitespace or a quote (got {:?})", prefix);
        }
        if self.session.tick_rate_hz == 0 {
            bail!("session.tick_rate_hz must be greater than zero");
        }
        if self.session.player_name.trim().is_empty() {
            bail!("session.player_name cannot be empty");
        }
        if !self.session.input_source().is_player() {
            bail!(
                "session.input_source {} is reserved for system messages",
                self.session.input_source
            );
        }
        if self.chat.namespace.is_empty() {
            bail!("chat.namespace cannot be empty");
        }
        if self.chat.window_name.is_empty() {
            bail!("chat.window_name cannot be empty");
        }
        Ok(())
    }

    /// Base data directory (~/.windowed-chat/)
    /// Can be overridden with the WINDOWED_CHAT_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".windowed-chat"))
    }

    /// Returns: ~/.windowed-chat/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Returns: ~/.windowed-chat/windowed-chat.log
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("windowed-chat.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let parsed = Config::parse(DEFAULT_CONFIG).expect("embedded config parses");
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("[session]\nmode = \"client\"\ninput_source = 3\n").unwrap();
        assert_eq!(config.session.mode, NetworkMode::Client);
        assert_eq!(config.session.input_source(), InputSource(3));
        assert_eq!(config.session.tick_rate_hz, 20);
        assert_eq!(config.commands.prefix, '/');
        assert_eq!(config.chat.max_message_count, 50);
        assert_eq!(config.lobby.permissions, LobbyPermissions::Open);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(Config::parse("[commands]\nprefix = \" \"\n").is_err());
        assert!(Config::parse("[session]\ntick_rate_hz = 0\n").is_err());
        assert!(Config::parse("[session]\ninput_source = -1\n").is_err());
        assert!(Config::parse("[chat]\nnamespace = \"\"\n").is_err());
        assert!(Config::parse("[commands]\nprefix = \"ab\"\n").is_err());
    }

    #[test]
    fn test_save_and_load_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.session.player_name = "Tester".to_string();
        config.commands.prefix = '!';
        config.chat.message_timeout = 0.0;
        config.lobby.permissions = LobbyPermissions::Private;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_path(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_chat_window_request() {
        let chat = ChatConfig::default();
        let req = chat.window_request();
        assert_eq!(req.name, "Chat");
        assert!(req.hide_name);
        assert_eq!(req.max_message_count, 50);
        assert_eq!(req.id(), crate::data::window_id("windowed-chat", "Chat"));
    }
}
