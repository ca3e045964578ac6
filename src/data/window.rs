//! Window state - a named, capacity- and time-bounded message history.

use super::message::{Message, MessageRequest};
use crate::commands::CommandSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

pub const DEFAULT_MESSAGE_TIMEOUT: f32 = 5.0;
pub const DEFAULT_MAX_MESSAGE_COUNT: usize = 10;

/// Stable window identifier derived from (namespace, name).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the window ID for a namespace/name pair.
///
/// Every participant computes the same value, so clients can look windows up
/// without ever creating them.
pub fn window_id(namespace: &str, name: &str) -> WindowId {
    let key = format!("{}:{}", namespace, name);
    WindowId(crc32fast::hash(key.as_bytes()) as i32)
}

/// Visual style hint passed through to renderers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStyle {
    #[default]
    Normal,
}

/// Called once for every accepted message request on a window.
pub type MessageCallback = Box<dyn FnMut(WindowId, &MessageRequest)>;

/// Everything needed to create a window on the next tick.
pub struct NewWindowRequest {
    pub namespace: String,
    pub name: String,
    pub hide_name: bool,
    pub read_only: bool,
    pub max_message_count: usize,
    /// Default lifetime in seconds; <= 0 means messages never expire
    pub message_timeout: f32,
    pub style: WindowStyle,
    pub do_not_draw: bool,
    pub can_drag: bool,
    pub command_set: Option<Box<dyn CommandSet>>,
    pub on_message: Option<MessageCallback>,
}

impl NewWindowRequest {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            hide_name: false,
            read_only: false,
            max_message_count: DEFAULT_MAX_MESSAGE_COUNT,
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            style: WindowStyle::Normal,
            do_not_draw: false,
            can_drag: true,
            command_set: None,
            on_message: None,
        }
    }

    pub fn id(&self) -> WindowId {
        window_id(&self.namespace, &self.name)
    }

    pub fn hide_name(mut self, hide: bool) -> Self {
        self.hide_name = hide;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn max_message_count(mut self, count: usize) -> Self {
        self.max_message_count = count;
        self
    }

    pub fn message_timeout(mut self, seconds: f32) -> Self {
        self.message_timeout = seconds;
        self
    }

    pub fn style(mut self, style: WindowStyle) -> Self {
        self.style = style;
        self
    }

    pub fn do_not_draw(mut self, do_not_draw: bool) -> Self {
        self.do_not_draw = do_not_draw;
        self
    }

    pub fn can_drag(mut self, can_drag: bool) -> Self {
        self.can_drag = can_drag;
        self
    }

    pub fn command_set(mut self, set: impl CommandSet + 'static) -> Self {
        self.command_set = Some(Box::new(set));
        self
    }

    pub fn on_message(mut self, callback: impl FnMut(WindowId, &MessageRequest) + 'static) -> Self {
        self.on_message = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for NewWindowRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewWindowRequest")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("hide_name", &self.hide_name)
            .field("read_only", &self.read_only)
            .field("max_message_count", &self.max_message_count)
            .field("message_timeout", &self.message_timeout)
            .field("command_set", &self.command_set.as_ref().map(|s| s.name().to_string()))
            .field("on_message", &self.on_message.is_some())
            .finish()
    }
}

/// A live window and its message history (oldest first)
#[derive(Clone, Debug)]
pub struct Window {
    id: WindowId,
    pub name: String,
    pub hide_name: bool,
    pub read_only: bool,
    pub style: WindowStyle,
    pub do_not_draw: bool,
    pub can_drag: bool,
    max_message_count: usize,
    message_timeout: f32,
    last_message_index: u32,
    messages: VecDeque<Message>,
}

impl Window {
    pub fn from_request(request: &NewWindowRequest) -> Self {
        Self {
            id: request.id(),
            name: request.name.clone(),
            hide_name: request.hide_name,
            read_only: request.read_only,
            style: request.style,
            do_not_draw: request.do_not_draw,
            can_drag: request.can_drag,
            max_message_count: request.max_message_count,
            message_timeout: request.message_timeout,
            last_message_index: 0,
            messages: VecDeque::with_capacity(request.max_message_count.min(256)),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn max_message_count(&self) -> usize {
        self.max_message_count
    }

    pub fn message_timeout(&self) -> f32 {
        self.message_timeout
    }

    /// Index the next appended message will receive
    pub fn last_message_index(&self) -> u32 {
        self.last_message_index
    }

    pub fn messages(&self) -> &VecDeque<Message> {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Age every message by `dt` seconds and evict expired and overflow entries.
    ///
    /// Single pass from newest to oldest: a message goes once it has expired
    /// or once more than `max_message_count` messages have been scanned.
    /// Returns the number of evicted messages.
    pub fn age_messages(&mut self, dt: f32) -> usize {
        let before = self.messages.len();
        let mut scanned = 0;
        let mut i = self.messages.len();
        while i > 0 {
            i -= 1;
            scanned += 1;
            let expired = self.messages[i].age(dt);
            if expired || scanned > self.max_message_count {
                self.messages.remove(i);
            }
        }
        before - self.messages.len()
    }

    /// Append a message built from `request`, returning its index.
    pub fn append(&mut self, request: &MessageRequest) -> u32 {
        let index = self.last_message_index;
        self.last_message_index = self.last_message_index.wrapping_add(1);

        let timeout = self.resolve_timeout(request.timeout_override);
        self.messages.push_back(Message::from_request(request, index, timeout));

        while self.messages.len() > self.max_message_count {
            self.messages.pop_front();
        }
        index
    }

    fn resolve_timeout(&self, timeout_override: Option<f32>) -> Option<f32> {
        match timeout_override {
            Some(seconds) if seconds > 0.0 => Some(seconds),
            _ if self.message_timeout > 0.0 => Some(self.message_timeout),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InputSource;

    fn window(max: usize, timeout: f32) -> Window {
        Window::from_request(
            &NewWindowRequest::new("tests", "Log")
                .max_message_count(max)
                .message_timeout(timeout),
        )
    }

    fn say(window: &Window, text: &str) -> MessageRequest {
        MessageRequest::new(window.id(), InputSource(2), "Ann", text)
    }

    #[test]
    fn test_window_id_is_deterministic() {
        assert_eq!(window_id("mod.guid", "Chat"), window_id("mod.guid", "Chat"));
        assert_ne!(window_id("mod.guid", "Chat"), window_id("mod.guid", "Log"));
        assert_ne!(window_id("a", "b:c"), window_id("a", "bc"));
        assert_eq!(NewWindowRequest::new("mod.guid", "Chat").id(), window_id("mod.guid", "Chat"));
    }

    #[test]
    fn test_capacity_keeps_newest() {
        let mut w = window(3, 0.0);
        for i in 0..5 {
            let req = say(&w, &format!("m{}", i));
            w.append(&req);
        }
        let texts: Vec<&str> = w.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);

        // Aging keeps the same survivors in the same order
        w.age_messages(1.0);
        let texts: Vec<&str> = w.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_indices_increase_and_are_never_reused() {
        let mut w = window(2, 0.0);
        let mut indices = Vec::new();
        for i in 0..4 {
            let req = say(&w, &format!("m{}", i));
            indices.push(w.append(&req));
        }
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(w.last_message_index(), 4);
        let kept: Vec<u32> = w.messages().iter().map(|m| m.index()).collect();
        assert_eq!(kept, vec![2, 3]);
    }

    #[test]
    fn test_timeout_eviction_after_third_tick() {
        let mut w = window(10, 0.0);
        let req = say(&w, "short lived").with_timeout(2.0);
        w.append(&req);

        assert_eq!(w.age_messages(1.0), 0);
        assert_eq!(w.age_messages(1.0), 0);
        assert_eq!(w.len(), 1);
        assert_eq!(w.age_messages(1.0), 1);
        assert!(w.is_empty());
    }

    #[test]
    fn test_timeout_resolution() {
        let mut w = window(10, 5.0);

        let req = say(&w, "window default");
        w.append(&req);
        let req = say(&w, "override").with_timeout(1.5);
        w.append(&req);
        let req = say(&w, "zero override falls back").with_timeout(0.0);
        w.append(&req);

        let msgs = w.messages();
        assert!(msgs[0].has_timeout());
        assert_eq!(msgs[0].time_remaining(), 5.0);
        assert_eq!(msgs[1].time_remaining(), 1.5);
        assert_eq!(msgs[2].time_remaining(), 5.0);

        let mut forever = window(10, 0.0);
        let req = say(&forever, "forever");
        forever.append(&req);
        assert!(!forever.messages()[0].has_timeout());
        forever.age_messages(1000.0);
        assert_eq!(forever.len(), 1);
    }

    #[test]
    fn test_expired_and_overflow_in_one_pass() {
        let mut w = window(2, 0.0);
        let req = say(&w, "old").with_timeout(0.5);
        w.append(&req);
        let req = say(&w, "mid");
        w.append(&req);
        let req = say(&w, "new").with_timeout(0.5);
        w.append(&req);
        assert_eq!(w.len(), 2);

        // "new" expires, "mid" survives
        w.age_messages(1.0);
        let texts: Vec<&str> = w.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["mid"]);
    }
}
