//! cabdash: terminal admin dashboard and booking analytics for a cab-booking backend

pub mod backend;
pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod services;
pub mod tui;
pub mod types;
