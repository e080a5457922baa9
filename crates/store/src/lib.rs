//! Best-effort persistence of submitted messages.
//!
//! Writes never feed back into the animation: a failed save is logged and
//! reported to the caller, nothing is retried or rolled back.

use foundation::math::LatLng;
use globe::ArcRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod firestore;
mod memory;

pub use firestore::{FirestoreMessageStore, HttpResponse, HttpTransport, commit_url};
#[cfg(target_arch = "wasm32")]
pub use firestore::GlooTransport;
pub use memory::InMemoryMessageStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub text: String,
    pub sender: LatLng,
    pub destination: LatLng,
}

impl From<&ArcRecord> for MessageRecord {
    fn from(arc: &ArcRecord) -> Self {
        Self {
            text: arc.message.clone(),
            sender: arc.start,
            destination: arc.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub record: MessageRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message store unreachable: {0}")]
    Transport(String),
    #[error("message store rejected write ({code}): {body}")]
    Status { code: u16, body: String },
    #[error("failed to encode message document: {0}")]
    Encode(String),
    #[error("failed to decode store response: {0}")]
    Decode(String),
}

pub trait MessageStore {
    /// Persists one message and returns its document id.
    fn save(&self, record: &MessageRecord) -> impl Future<Output = Result<String, StoreError>>;
}
