//! Transient attachment previews.
//!
//! A preview is a local rendering reference for the selected avatar. It is
//! acquired when a file is selected and must be released when a new file
//! replaces it or the form goes away. [`PreviewHandle`] releases on drop, so
//! holding at most one handle per form is enough to never leak.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::form::Attachment;
use crate::identifiers::PreviewId;

/// Creates and revokes local preview references.
pub trait PreviewRenderer: Send + Sync {
    /// Registers a preview for `attachment`.
    fn create(&self, attachment: &Attachment) -> PreviewId;

    /// The displayable reference for `id`, if it is still live.
    fn url(&self, id: PreviewId) -> Option<String>;

    /// Releases `id`. Revoking an unknown id is a no-op.
    fn revoke(&self, id: PreviewId);
}

/// Owned preview reference; revoked when dropped.
pub struct PreviewHandle {
    id: PreviewId,
    renderer: Arc<dyn PreviewRenderer>,
}

impl PreviewHandle {
    /// Acquires a preview for `attachment`.
    pub fn acquire(renderer: Arc<dyn PreviewRenderer>, attachment: &Attachment) -> Self {
        let id = renderer.create(attachment);
        tracing::debug!(preview = %id, file = attachment.file_name(), "preview acquired");
        Self { id, renderer }
    }

    /// Identifier of the preview.
    pub fn id(&self) -> PreviewId {
        self.id
    }

    /// Displayable reference.
    pub fn url(&self) -> Option<String> {
        self.renderer.url(self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.renderer.revoke(self.id);
        tracing::debug!(preview = %self.id, "preview revoked");
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}

// ---------------------------------------------------------------------------
// In-memory renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct PreviewEntry {
    mime_type: String,
    size: u64,
}

/// Renderer that mints `blob:`-style references and tracks which are live.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    live: Mutex<HashMap<PreviewId, PreviewEntry>>,
}

impl ObjectUrlRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of previews not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// MIME type and size recorded for a live preview.
    pub fn describe(&self, id: PreviewId) -> Option<(String, u64)> {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|entry| (entry.mime_type.clone(), entry.size))
    }
}

impl PreviewRenderer for ObjectUrlRegistry {
    fn create(&self, attachment: &Attachment) -> PreviewId {
        let id = PreviewId::new_random();
        self.live.lock().unwrap_or_else(PoisonError::into_inner).insert(
            id,
            PreviewEntry {
                mime_type: attachment.mime_type().to_owned(),
                size: attachment.size(),
            },
        );
        id
    }

    fn url(&self, id: PreviewId) -> Option<String> {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
            .then(|| format!("blob:preview/{id}"))
    }

    fn revoke(&self, id: PreviewId) {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}
