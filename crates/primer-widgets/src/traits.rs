//! Trait definitions for demo widgets.

/// A widget that can be mounted on a demo page.
///
/// A widget contributes two artifacts: the initial server-rendered markup
/// placed inside the mount container, and a client script that makes the
/// markup interactive. The script must agree with the server-rendered state,
/// so that the page shows the same value before and after hydration.
pub trait Widget: Send + Sync {
    /// Widget identifier used in demo manifests (e.g. "counter")
    fn name(&self) -> &'static str;

    /// Initial markup rendered into the mount container.
    fn initial_html(&self) -> String;

    /// Client script implementing the widget's behavior.
    ///
    /// `mount_id` is the id of the container element the markup was rendered
    /// into; the script scopes all element lookups to that container.
    fn script(&self, mount_id: &str) -> String;
}
