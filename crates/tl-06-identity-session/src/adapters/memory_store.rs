//! In-memory session store.

use parking_lot::RwLock;

use crate::domain::SessionError;
use crate::ports::SessionStore;

/// Session store that lives as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slot: RwLock<Option<String>>,
}

impl InMemorySessionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot.read().clone())
    }

    fn save(&self, data: &str) -> Result<(), SessionError> {
        *self.slot.write() = Some(data.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.write() = None;
        Ok(())
    }
}
