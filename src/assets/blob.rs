//! The transient asset handle pool.

use std::collections::HashMap;

use super::TRANSIENT_SCHEME;

/// In-memory image bytes behind a transient handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime: String,
    pub data: Vec<u8>,
}

/// Owns the bytes behind every live `blob:` handle.
///
/// Handles are released explicitly; releasing twice is a no-op.
#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: HashMap<String, Blob>,
    next: u64,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes and return a fresh handle for them.
    pub fn create(&mut self, data: Vec<u8>, mime: impl Into<String>) -> String {
        self.next += 1;
        let handle = format!("{TRANSIENT_SCHEME}newsworthy/{}", self.next);
        self.blobs.insert(
            handle.clone(),
            Blob {
                mime: mime.into(),
                data,
            },
        );
        handle
    }

    pub fn get(&self, handle: &str) -> Option<&Blob> {
        self.blobs.get(handle)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.blobs.contains_key(handle)
    }

    /// Release a handle. Returns whether anything was released.
    pub fn revoke(&mut self, handle: &str) -> bool {
        let released = self.blobs.remove(handle).is_some();
        if released {
            log::debug!("revoked {handle}");
        }
        released
    }

    /// Number of handles not yet released.
    pub fn outstanding(&self) -> usize {
        self.blobs.len()
    }
}
