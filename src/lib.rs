// Library exports for testing and the binary.

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod flag;
pub mod globe;
pub mod highlight;
pub mod http;
pub mod lookup;
pub mod lookup_ui;
pub mod placeholder;
