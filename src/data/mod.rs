//! Data layer - Pure state without UI coupling
//!
//! Windows, messages and the views derived from them. NO rendering code and
//! no knowledge of queues or command sets beyond the window creation request.

pub mod message;
pub mod view;
pub mod window;

pub use message::*;
pub use view::*;
pub use window::*;
