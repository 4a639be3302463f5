use std::sync::Arc;
use std::sync::Mutex;

use anyhow::anyhow;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::SessionStorage;

/// In-process slot. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn with_blob(blob: &str) -> MemoryStorage {
        return MemoryStorage {
            slot: Arc::new(Mutex::new(Some(blob.to_string()))),
        };
    }

    pub fn blob(&self) -> Option<String> {
        return self.slot.lock().ok().and_then(|e| return e.clone());
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    fn describe(&self) -> String {
        return "memory".to_string();
    }

    async fn read(&self) -> Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| return anyhow!("memory slot poisoned"))?;
        return Ok(slot.clone());
    }

    async fn write(&self, blob: String) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| return anyhow!("memory slot poisoned"))?;
        *slot = Some(blob);
        return Ok(());
    }
}
