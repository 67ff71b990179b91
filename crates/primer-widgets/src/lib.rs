//! Interactive demo widgets for primer documentation.
//!
//! Widgets own a small piece of client-side state and render into a designated
//! mount container on a demo page. The server-side model is authoritative: the
//! generated client script implements the same state transitions as the Rust
//! type backing the widget.

pub mod counter;
pub mod mount;
pub mod registry;
pub mod traits;

pub use counter::{Counter, CounterWidget};
pub use mount::{inject_widget, MountError, DEFAULT_MOUNT_ID};
pub use registry::WidgetRegistry;
pub use traits::Widget;
