//! Development server with live reload for primer docs.
//!
//! Provides a fast development server with file watching and WebSocket-based
//! page reloading.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};
