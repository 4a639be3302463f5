#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;

use crate::domain::models::Envelope;
use crate::domain::models::SessionStorageBox;

/// Write-through mirror of the session store. Reads once at startup and
/// refuses to write until that read has finished, so defaults never clobber
/// stored sessions.
pub struct Persistence {
    storage: SessionStorageBox,
    hydrated: bool,
}

impl Persistence {
    pub fn new(storage: SessionStorageBox) -> Persistence {
        return Persistence {
            storage,
            hydrated: false,
        };
    }

    pub fn is_hydrated(&self) -> bool {
        return self.hydrated;
    }

    /// Missing, unreadable and malformed blobs all come back as `None`.
    pub async fn load(&mut self) -> Option<Envelope> {
        let res = self.storage.read().await;
        self.hydrated = true;

        let blob = match res {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::info!(storage = self.storage.describe(), "no stored sessions");
                return None;
            }
            Err(err) => {
                tracing::error!(storage = self.storage.describe(), error = ?err, "failed to read stored sessions");
                return None;
            }
        };

        return match serde_json::from_str::<Envelope>(&blob) {
            Ok(envelope) => {
                tracing::debug!(
                    sessions = envelope.sessions.len(),
                    active_id = envelope.active_id,
                    "loaded stored sessions"
                );
                Some(envelope)
            }
            Err(err) => {
                tracing::error!(storage = self.storage.describe(), error = %err, "discarding malformed stored sessions");
                None
            }
        };
    }

    /// Best-effort write. Failures are logged, never returned.
    pub async fn save(&self, envelope: &Envelope) {
        if !self.hydrated {
            tracing::debug!("skipping save before stored sessions were loaded");
            return;
        }

        let blob = match serde_json::to_string(envelope) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize sessions");
                return;
            }
        };

        if let Err(err) = self.storage.write(blob).await {
            tracing::error!(storage = self.storage.describe(), error = ?err, "failed to save sessions");
        }
    }
}
