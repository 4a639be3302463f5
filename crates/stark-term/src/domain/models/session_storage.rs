use anyhow::Result;
use async_trait::async_trait;

/// A single key-value slot holding the serialized envelope.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    fn describe(&self) -> String;
    async fn read(&self) -> Result<Option<String>>;
    async fn write(&self, blob: String) -> Result<()>;
}

pub type SessionStorageBox = Box<dyn SessionStorage>;
