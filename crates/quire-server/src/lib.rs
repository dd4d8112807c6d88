//! Development server with live reload for quire sites.
//!
//! Builds the site with the live-reload client injected, serves the output
//! directory, and rebuilds and notifies connected browsers when sources change.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{serve_dir, DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};
