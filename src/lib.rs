//! taller - terminal catalog manager for workshop programs
//!
//! The session controller in [`session`] and the focus-follow machine in
//! [`focus`] carry the behavior; [`ui`] and [`app`] put a terminal on it,
//! and [`api`] holds the repository clients they talk through.

pub mod api;
pub mod app;
pub mod config;
pub mod focus;
pub mod logging;
pub mod session;
pub mod types;
pub mod ui;
