use std::cell::{Cell, RefCell};

use crate::{MessageRecord, MessageStore, StoreError, StoredMessage};

/// Store kept in memory; used offline and in tests.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    saved: RefCell<Vec<StoredMessage>>,
    next_id: Cell<u64>,
    failure: RefCell<Option<StoreError>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following save fails with `err` until [`Self::recover`].
    pub fn fail_with(&self, err: StoreError) {
        *self.failure.borrow_mut() = Some(err);
    }

    pub fn recover(&self) {
        self.failure.borrow_mut().take();
    }

    pub fn saved(&self) -> Vec<StoredMessage> {
        self.saved.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.saved.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.borrow().is_empty()
    }
}

impl MessageStore for InMemoryMessageStore {
    async fn save(&self, record: &MessageRecord) -> Result<String, StoreError> {
        if let Some(err) = self.failure.borrow().clone() {
            tracing::error!(error = %err, "error saving message");
            return Err(err);
        }
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        let id = format!("mem-{n:04}");
        self.saved.borrow_mut().push(StoredMessage {
            id: id.clone(),
            record: record.clone(),
        });
        tracing::debug!(%id, "message saved in memory");
        Ok(id)
    }
}
