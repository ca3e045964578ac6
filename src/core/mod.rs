//! Core chat logic
//!
//! Session role, window storage and the tick-driven window manager. Nothing
//! here renders; frontends read [`crate::data::WindowView`]s.

pub mod session;
pub mod store;
pub mod window_manager;

pub use session::{NetworkMode, Session};
pub use store::{MemoryStore, WindowStore};
pub use window_manager::{ReplicatedMessage, WindowManager};
