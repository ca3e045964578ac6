//! Render/replication shape of a window.
//!
//! These are what cross the boundary to renderers and to non-host
//! participants. Timers and indices stay on the host.

use super::message::{InputSource, Message};
use super::window::{Window, WindowId, WindowStyle};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub input_source: InputSource,
    pub owner: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_override: Option<String>,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            input_source: message.input_source(),
            owner: message.owner().to_string(),
            text: message.text().to_string(),
            color_override: message.color_override().map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowView {
    pub window_id: WindowId,
    pub title: String,
    pub messages: Vec<MessageView>,
    pub style: WindowStyle,
    pub hide_title: bool,
    pub read_only: bool,
    pub draw_window: bool,
    pub can_drag: bool,
}

impl WindowView {
    /// True when the message list differs from `previous`.
    ///
    /// Only messages are compared; flag changes alone do not count as an update.
    pub fn is_changed_from(&self, previous: &WindowView) -> bool {
        self.messages != previous.messages
    }
}

impl From<&Window> for WindowView {
    fn from(window: &Window) -> Self {
        Self {
            window_id: window.id(),
            title: window.name.clone(),
            messages: window.messages().iter().map(MessageView::from).collect(),
            style: window.style,
            hide_title: window.hide_name,
            read_only: window.read_only,
            draw_window: !window.do_not_draw,
            can_drag: window.can_drag,
        }
    }
}
