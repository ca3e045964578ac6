//! Window manager - owns every window, the two pending-request queues and the
//! per-tick update that ages history, drains queues and runs command sets.
//!
//! Only the host mutates window state. On a client the same calls compute IDs
//! and forward requests through the outbox; the windows it displays come in
//! through [`WindowManager::apply_snapshot`].

use super::session::Session;
use super::store::{MemoryStore, WindowStore};
use crate::commands::{CommandInterpreter, CommandStatus, RunOutcome};
use crate::data::{
    InputSource, MessageCallback, MessageRequest, NewWindowRequest, Window, WindowId, WindowView,
};
use crate::error::WindowError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// A message on its way between participants.
///
/// Clients produce these for the host; the host turns them back into
/// [`MessageRequest`]s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplicatedMessage {
    pub window_id: WindowId,
    pub input_source: InputSource,
    pub owner: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_override: Option<f32>,
}

impl From<MessageRequest> for ReplicatedMessage {
    fn from(request: MessageRequest) -> Self {
        Self {
            window_id: request.target_window,
            input_source: request.input_source,
            owner: request.owner,
            text: request.text,
            color_override: request.color_override,
            timeout_override: request.timeout_override,
        }
    }
}

impl From<ReplicatedMessage> for MessageRequest {
    fn from(message: ReplicatedMessage) -> Self {
        Self {
            target_window: message.window_id,
            input_source: message.input_source,
            owner: message.owner,
            text: message.text,
            color_override: message.color_override,
            timeout_override: message.timeout_override,
        }
    }
}

pub struct WindowManager<S: WindowStore = MemoryStore> {
    session: Session,
    store: S,
    pending_messages: VecDeque<MessageRequest>,
    pending_windows: VecDeque<NewWindowRequest>,
    interpreters: HashMap<WindowId, CommandInterpreter>,
    callbacks: HashMap<WindowId, MessageCallback>,
    /// Requests waiting for the transport to carry them to the host
    outbox: VecDeque<ReplicatedMessage>,
    /// Client only: last views received from the host
    replicated: Vec<WindowView>,
    /// Host only: views handed out by `collect_updates`
    last_sent: HashMap<WindowId, WindowView>,
}

impl WindowManager<MemoryStore> {
    pub fn new(session: Session) -> Self {
        Self::with_store(session, MemoryStore::new())
    }
}

impl<S: WindowStore> WindowManager<S> {
    pub fn with_store(session: Session, store: S) -> Self {
        Self {
            session,
            store,
            pending_messages: VecDeque::new(),
            pending_windows: VecDeque::new(),
            interpreters: HashMap::new(),
            callbacks: HashMap::new(),
            outbox: VecDeque::new(),
            replicated: Vec::new(),
            last_sent: HashMap::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Queue a window for creation on a later tick and return its ID.
    ///
    /// Clients only get the ID back; nothing is queued.
    pub fn request_create_window(&mut self, request: NewWindowRequest) -> Result<WindowId, WindowError> {
        if request.namespace.is_empty() {
            tracing::error!("request_create_window: namespace cannot be empty");
            return Err(WindowError::EmptyNamespace);
        }
        if request.name.is_empty() {
            tracing::error!("request_create_window: name cannot be empty");
            return Err(WindowError::EmptyName);
        }

        let id = request.id();
        if self.session.is_host() {
            tracing::debug!("Queued window '{}' ({}) for creation", request.name, id);
            self.pending_windows.push_back(request);
        } else {
            tracing::debug!("Not host, window '{}' ({}) is looked up only", request.name, id);
        }
        Ok(id)
    }

    /// Queue a message request. Window existence is checked when it is drained.
    ///
    /// On a client the request is forwarded through the outbox instead.
    pub fn submit(&mut self, request: MessageRequest) {
        if self.session.is_host() {
            self.pending_messages.push_back(request);
        } else {
            self.outbox.push_back(request.into());
        }
    }

    /// Post a system (non-player) message.
    pub fn send_message(
        &mut self,
        window_id: WindowId,
        sender_name: &str,
        text: &str,
        color_override: Option<String>,
        timeout_override: Option<f32>,
    ) {
        let mut request = MessageRequest::system(window_id, sender_name, text);
        request.color_override = color_override;
        request.timeout_override = timeout_override;
        self.submit(request);
    }

    /// Post text typed by the local player.
    pub fn post_player_message(&mut self, window_id: WindowId, text: &str) {
        let request = MessageRequest::new(
            window_id,
            self.session.local_source,
            self.session.player_name.clone(),
            text,
        );
        self.submit(request);
    }

    /// Accept a message forwarded by another participant.
    pub fn receive_replicated(&mut self, message: ReplicatedMessage) {
        if !self.session.is_host() {
            tracing::debug!("Not host, ignoring replicated message for window {}", message.window_id);
            return;
        }
        self.pending_messages.push_back(message.into());
    }

    /// Drain everything waiting to be forwarded to the host.
    pub fn take_outbound(&mut self) -> Vec<ReplicatedMessage> {
        self.outbox.drain(..).collect()
    }

    pub fn pending_message_count(&self) -> usize {
        self.pending_messages.len()
    }

    pub fn pending_window_count(&self) -> usize {
        self.pending_windows.len()
    }

    /// Run one update. Host only; a no-op on clients.
    ///
    /// Ages every window by `dt` seconds, then drains at most one message
    /// request and at most one window creation request.
    pub fn tick(&mut self, dt: f32) {
        if !self.session.is_host() {
            return;
        }

        for id in self.store.window_ids() {
            if let Some(window) = self.store.get_mut(id) {
                let evicted = window.age_messages(dt);
                if evicted > 0 {
                    tracing::trace!("Evicted {} message(s) from window {}", evicted, id);
                }
            }
        }

        self.drain_message();
        self.drain_window();
    }

    fn drain_message(&mut self) {
        let Some(target) = self.pending_messages.front().map(|r| r.target_window) else {
            return;
        };

        if !self.store.contains(target) {
            // Created later this tick; keep the request at the head until then
            if self.pending_windows.iter().any(|w| w.id() == target) {
                tracing::trace!("Window {} is still being created, holding message", target);
                return;
            }
            self.pending_messages.pop_front();
            tracing::error!(
                "Failed to send text! {}",
                WindowError::UnknownWindow(target)
            );
            return;
        }

        let Some(mut request) = self.pending_messages.pop_front() else {
            return;
        };

        let is_host_player = self.session.is_host_player(request.input_source);
        let outcome = match self.interpreters.get_mut(&target) {
            Some(interpreter) => interpreter.run(&request, is_host_player),
            None => RunOutcome::pass_through(),
        };

        if let Some(text) = outcome.rewritten_text {
            request.text = text;
        }

        if let Some(window) = self.store.get_mut(target) {
            if outcome.echo {
                let index = window.append(&request);
                tracing::debug!("Window {} <- #{} from {}", target, index, request.owner);
            }
            if let Some(reply) = &outcome.status_reply {
                let index = window.append(reply);
                tracing::debug!("Window {} <- #{} status from {}", target, index, reply.owner);
            }
        }

        if let Some(callback) = self.callbacks.get_mut(&target) {
            callback(target, &request);
        }
    }

    fn drain_window(&mut self) {
        let Some(request) = self.pending_windows.pop_front() else {
            return;
        };

        let id = request.id();
        if self.store.contains(id) {
            tracing::error!(
                "{}",
                WindowError::DuplicateWindow {
                    id,
                    name: request.name.clone(),
                }
            );
            return;
        }

        let window = Window::from_request(&request);
        if !self.store.create(window) {
            tracing::error!("Window store refused window '{}' ({})", request.name, id);
            return;
        }

        if let Some(set) = request.command_set {
            self.interpreters.insert(id, CommandInterpreter::new(set));
        }
        if let Some(callback) = request.on_message {
            self.callbacks.entry(id).or_insert(callback);
        }

        tracing::info!(
            "Created window '{}' ({}) max_messages={} timeout={}s",
            request.name,
            id,
            request.max_message_count,
            request.message_timeout
        );
    }

    /// Host-side window state
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.store.get(id)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.store.window_ids()
    }

    /// Status of the last command run for a window's command set
    pub fn command_status(&self, id: WindowId) -> Option<CommandStatus> {
        self.interpreters.get(&id).map(CommandInterpreter::last_status)
    }

    /// Render view of one window (replicated copy on clients)
    pub fn view(&self, id: WindowId) -> Option<WindowView> {
        if self.session.is_host() {
            self.store.get(id).map(WindowView::from)
        } else {
            self.replicated.iter().find(|v| v.window_id == id).cloned()
        }
    }

    /// Views of every window, in creation order
    pub fn snapshot(&self) -> Vec<WindowView> {
        if self.session.is_host() {
            self.store
                .window_ids()
                .into_iter()
                .filter_map(|id| self.store.get(id).map(WindowView::from))
                .collect()
        } else {
            self.replicated.clone()
        }
    }

    /// Views whose messages changed since the previous call (host only).
    pub fn collect_updates(&mut self) -> Vec<WindowView> {
        if !self.session.is_host() {
            return Vec::new();
        }

        let mut updates = Vec::new();
        for view in self.snapshot() {
            let changed = self
                .last_sent
                .get(&view.window_id)
                .map_or(true, |previous| view.is_changed_from(previous));
            if changed {
                self.last_sent.insert(view.window_id, view.clone());
                updates.push(view);
            }
        }
        updates
    }

    /// Take window views from the host (client only).
    pub fn apply_snapshot(&mut self, views: Vec<WindowView>) {
        if self.session.is_host() {
            tracing::warn!("Host ignoring {} replicated window view(s)", views.len());
            return;
        }

        for view in views {
            match self.replicated.iter_mut().find(|v| v.window_id == view.window_id) {
                Some(existing) => *existing = view,
                None => self.replicated.push(view),
            }
        }
    }

    /// Tear down all session state.
    pub fn end_session(&mut self) {
        let destroyed = self.store.destroy_where(&mut |_| true);
        self.pending_messages.clear();
        self.pending_windows.clear();
        self.interpreters.clear();
        self.callbacks.clear();
        self.outbox.clear();
        self.replicated.clear();
        self.last_sent.clear();
        tracing::info!("Session ended, destroyed {} window(s)", destroyed);
    }
}
