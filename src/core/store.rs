//! Window storage behind a narrow interface.
//!
//! The window manager never assumes how windows are kept. An entity store that
//! replicates components over the network can implement [`WindowStore`] just
//! as well as the in-memory [`MemoryStore`].

use crate::data::{Window, WindowId};

pub trait WindowStore {
    /// IDs of every stored window, in creation order
    fn window_ids(&self) -> Vec<WindowId>;

    fn get(&self, id: WindowId) -> Option<&Window>;

    fn get_mut(&mut self, id: WindowId) -> Option<&mut Window>;

    /// Store a new window. Returns false (and keeps the existing one) if the
    /// ID is already taken.
    fn create(&mut self, window: Window) -> bool;

    /// Remove every window matching `filter`, returning how many went.
    fn destroy_where(&mut self, filter: &mut dyn FnMut(&Window) -> bool) -> usize;

    fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    fn len(&self) -> usize {
        self.window_ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Windows kept in a plain vector, in creation order
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    windows: Vec<Window>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowStore for MemoryStore {
    fn window_ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(Window::id).collect()
    }

    fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id() == id)
    }

    fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id() == id)
    }

    fn create(&mut self, window: Window) -> bool {
        if self.contains(window.id()) {
            return false;
        }
        self.windows.push(window);
        true
    }

    fn destroy_where(&mut self, filter: &mut dyn FnMut(&Window) -> bool) -> usize {
        let before = self.windows.len();
        self.windows.retain(|w| !filter(w));
        before - self.windows.len()
    }

    fn len(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NewWindowRequest;

    fn window(name: &str) -> Window {
        Window::from_request(&NewWindowRequest::new("tests", name))
    }

    #[test]
    fn test_create_rejects_duplicates() {
        let mut store = MemoryStore::new();
        assert!(store.create(window("Chat")));
        let mut dup = window("Chat");
        dup.read_only = true;
        assert!(!store.create(dup));
        assert_eq!(store.len(), 1);

        let kept = store.get(window("Chat").id()).unwrap();
        assert!(!kept.read_only);
    }

    #[test]
    fn test_creation_order_and_destroy() {
        let mut store = MemoryStore::new();
        store.create(window("A"));
        store.create(window("B"));
        store.create(window("C"));
        assert_eq!(
            store.window_ids(),
            vec![window("A").id(), window("B").id(), window("C").id()]
        );

        let removed = store.destroy_where(&mut |w| w.name != "B");
        assert_eq!(removed, 2);
        assert_eq!(store.window_ids(), vec![window("B").id()]);
        assert!(!store.is_empty());
    }
}
