//! The "last session" pointer.
//!
//! One pointer is shared by every user of a bridge: it is not scoped per
//! sender or per channel. Every mutation is a single assignment under a
//! short lock, so concurrent callers can overwrite each other's value but
//! never observe a torn one. The plugin runtime processes one request at a
//! time, which keeps that race out of the shipped binary.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Length of the identifier prefix shown to users.
const SHORT_ID_LEN: usize = 8;

/// Handle to the session the next default submission should continue.
///
/// Clones share the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct SessionPointer {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionPointer {
    /// Create an empty pointer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session identifier, if any.
    pub fn get(&self) -> Option<String> {
        self.read().clone()
    }

    /// Point at `session_id`. An empty identifier clears the pointer.
    pub fn set(&self, session_id: impl Into<String>) {
        let session_id = session_id.into();
        *self.write() = (!session_id.is_empty()).then_some(session_id);
    }

    /// Forget the current session.
    pub fn clear(&self) {
        *self.write() = None;
    }

    // A poisoned lock still holds a whole Option; keep using it.
    fn read(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// First eight characters of a session identifier.
pub fn short_id(session_id: &str) -> &str {
    match session_id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &session_id[..idx],
        None => session_id,
    }
}
