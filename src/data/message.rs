//! Message records: inbound requests and appended history entries.

use super::window::WindowId;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of whoever produced a message.
///
/// Players carry the input source of their client; system code and command
/// sets use [`InputSource::SYSTEM`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSource(pub i32);

impl InputSource {
    /// Sentinel for non-player senders
    pub const SYSTEM: InputSource = InputSource(-1);

    pub fn is_player(self) -> bool {
        self != Self::SYSTEM
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request to append text to a window.
///
/// Consumed exactly once by the window manager when it is drained.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageRequest {
    pub target_window: WindowId,
    pub input_source: InputSource,
    /// Sender display name
    pub owner: String,
    pub text: String,
    /// Hex color "#RRGGBB"
    pub color_override: Option<String>,
    /// Seconds; overrides the window default when > 0
    pub timeout_override: Option<f32>,
}

impl MessageRequest {
    pub fn new(
        target_window: WindowId,
        input_source: InputSource,
        owner: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            target_window,
            input_source,
            owner: owner.into(),
            text: text.into(),
            color_override: None,
            timeout_override: None,
        }
    }

    /// A message from system code rather than a player.
    pub fn system(target_window: WindowId, owner: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(target_window, InputSource::SYSTEM, owner, text)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color_override = Some(color.into());
        self
    }

    pub fn with_timeout(mut self, seconds: f32) -> Self {
        self.timeout_override = Some(seconds);
        self
    }

    pub fn is_player_message(&self) -> bool {
        self.input_source.is_player()
    }
}

/// A message that has been appended to a window's history.
///
/// Everything except the remaining lifetime is fixed at append time.
#[derive(Clone, Debug)]
pub struct Message {
    window_id: WindowId,
    index: u32,
    input_source: InputSource,
    owner: String,
    text: String,
    color_override: Option<String>,
    has_timeout: bool,
    time_remaining: f32,
    received_at: DateTime<Local>,
}

impl Message {
    pub(crate) fn from_request(request: &MessageRequest, index: u32, timeout: Option<f32>) -> Self {
        Self {
            window_id: request.target_window,
            index,
            input_source: request.input_source,
            owner: request.owner.clone(),
            text: request.text.clone(),
            color_override: request.color_override.clone(),
            has_timeout: timeout.is_some(),
            time_remaining: timeout.unwrap_or(0.0),
            received_at: Local::now(),
        }
    }

    /// Count down by `dt` seconds. Returns true once the message has expired.
    pub(crate) fn age(&mut self, dt: f32) -> bool {
        if !self.has_timeout {
            return false;
        }
        self.time_remaining -= dt;
        self.time_remaining < 0.0
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn input_source(&self) -> InputSource {
        self.input_source
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color_override(&self) -> Option<&str> {
        self.color_override.as_deref()
    }

    pub fn has_timeout(&self) -> bool {
        self.has_timeout
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn received_at(&self) -> DateTime<Local> {
        self.received_at
    }

    pub fn is_player_message(&self) -> bool {
        self.input_source.is_player()
    }
}
