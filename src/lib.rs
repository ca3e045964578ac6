//! Windowed chat - host-authoritative chat windows with per-window command sets
//!
//! Windows are created and messages delivered through queues drained once per
//! tick by [`core::WindowManager`]. Text starting with a command prefix is
//! routed through the window's [`commands::CommandSet`] before it is shown.

pub mod commands;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod lobby;
