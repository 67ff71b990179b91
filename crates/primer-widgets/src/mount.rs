//! Mount-point injection for demo pages.

use regex::Regex;

/// Default id of the mount container on a demo page.
pub const DEFAULT_MOUNT_ID: &str = "root";

/// Errors that can occur when injecting a widget into a page.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("Couldn't find the #{0} element in the host page")]
    MissingMountPoint(String),

    #[error("Invalid mount id: {0}")]
    InvalidMountId(String),
}

/// Inject widget markup and its script into a host page.
///
/// The first element whose opening tag carries `id="{mount_id}"` receives the
/// widget markup as its content; the script tag is inserted before `</body>`
/// (appended to the document if no body close tag exists). The host page is
/// otherwise returned unmodified.
///
/// Fails with [`MountError::MissingMountPoint`] when no matching container
/// exists; callers decide how to surface the diagnostic.
pub fn inject_widget(
    page_html: &str,
    mount_id: &str,
    widget_html: &str,
    script_src: &str,
) -> Result<String, MountError> {
    if mount_id.is_empty() || !mount_id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MountError::InvalidMountId(mount_id.to_string()));
    }

    // Empty containers only: demo entry pages declare the mount point as
    // `<div id="root"></div>`, matching how bundlers treat entry HTML.
    let pattern = format!(
        r#"(?s)(<[a-zA-Z][^>]*\bid="{}"[^>]*>)\s*(</[a-zA-Z][a-zA-Z0-9]*>)"#,
        regex::escape(mount_id)
    );
    let re = Regex::new(&pattern).expect("mount pattern is valid");

    if !re.is_match(page_html) {
        return Err(MountError::MissingMountPoint(mount_id.to_string()));
    }

    let replacement = format!("${{1}}{}${{2}}", widget_html.replace('$', "$$"));
    let mounted = re.replace(page_html, replacement.as_str()).to_string();

    let script_tag = format!(r#"<script type="module" src="{}"></script>"#, script_src);
    let with_script = if let Some(pos) = mounted.find("</body>") {
        let mut out = String::with_capacity(mounted.len() + script_tag.len());
        out.push_str(&mounted[..pos]);
        out.push_str(&script_tag);
        out.push('\n');
        out.push_str(&mounted[pos..]);
        out
    } else {
        let mut out = mounted;
        out.push('\n');
        out.push_str(&script_tag);
        out
    };

    Ok(with_script)
}
