//! Terminal implementations of the UI ports.

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use signup::{Attachment, Navigator, Notification, NotificationLevel, Notifier, RoutePath};

/// Shared, line-oriented output sink.
pub type Sink = Arc<Mutex<dyn Write + Send>>;

fn write_line(sink: &Sink, line: std::fmt::Arguments<'_>) {
    let mut out = sink.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(error) = writeln!(out, "{line}") {
        tracing::warn!(%error, "cannot write to console");
    }
}

/// Prints notifications, one per line.
pub struct ConsoleNotifier {
    sink: Sink,
}

impl ConsoleNotifier {
    /// Writes to `sink`.
    pub fn new(sink: Sink) -> Self {
        Self { sink }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        let tag = match notification.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        write_line(&self.sink, format_args!("[{tag}] {}", notification.message));
    }
}

/// Reports navigation instead of performing it.
pub struct ConsoleNavigator {
    sink: Sink,
}

impl ConsoleNavigator {
    /// Writes to `sink`.
    pub fn new(sink: Sink) -> Self {
        Self { sink }
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: &RoutePath) {
        write_line(&self.sink, format_args!("-> {route}"));
    }
}

/// Guesses an image MIME type from the file extension.
///
/// Unknown extensions map to `application/octet-stream`, which the
/// validation schema then rejects as an unsupported type.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Reads the file at `path` into an attachment.
pub fn load_attachment(path: &Path) -> Result<Attachment> {
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read avatar {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_owned());
    Ok(Attachment::new(file_name, mime_for_path(path), bytes))
}
