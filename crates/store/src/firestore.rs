//! Firestore REST client for the `messages` collection.

use std::cell::RefCell;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

use crate::{MessageRecord, MessageStore, StoreError};

const API_ROOT: &str = "https://firestore.googleapis.com/v1";
const DOCUMENT_ID_LEN: usize = 20;

/// Everything but RFC 3986 unreserved characters is escaped, so a value can
/// sit in either a path segment or a query value.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal JSON POST capability; the browser build uses `fetch`.
pub trait HttpTransport {
    fn post_json(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<HttpResponse, StoreError>>;
}

pub fn commit_url(project_id: &str, api_key: &str) -> String {
    let project = utf8_percent_encode(project_id, COMPONENT);
    let key = utf8_percent_encode(api_key, COMPONENT);
    format!("{API_ROOT}/projects/{project}/databases/(default)/documents:commit?key={key}")
}

#[derive(Debug)]
pub struct FirestoreMessageStore<T> {
    transport: T,
    project_id: String,
    api_key: String,
    collection: String,
    rng: RefCell<StdRng>,
}

impl<T: HttpTransport> FirestoreMessageStore<T> {
    pub fn new(
        transport: T,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self::with_rng(
            transport,
            project_id,
            api_key,
            collection,
            StdRng::from_entropy(),
        )
    }

    pub fn with_rng(
        transport: T,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        collection: impl Into<String>,
        rng: StdRng,
    ) -> Self {
        Self {
            transport,
            project_id: project_id.into(),
            api_key: api_key.into(),
            collection: collection.into(),
            rng: RefCell::new(rng),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn next_document_id(&self) -> String {
        let mut rng = self.rng.borrow_mut();
        (0..DOCUMENT_ID_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    }

    fn document_name(&self, id: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}/{}",
            self.project_id, self.collection, id
        )
    }

    /// Body of a single-write `documents:commit` that creates the document
    /// and stamps `createdAt` with the server's request time.
    pub fn commit_body(&self, id: &str, record: &MessageRecord) -> Value {
        json!({
            "writes": [{
                "update": {
                    "name": self.document_name(id),
                    "fields": {
                        "text": { "stringValue": record.text },
                        "senderLocation": lat_lng_value(record.sender.lat, record.sender.lng),
                        "destinationLocation": lat_lng_value(record.destination.lat, record.destination.lng),
                        "printed": { "booleanValue": false },
                    },
                },
                "updateTransforms": [{
                    "fieldPath": "createdAt",
                    "setToServerValue": "REQUEST_TIME",
                }],
                "currentDocument": { "exists": false },
            }],
        })
    }

    async fn commit(&self, record: &MessageRecord) -> Result<String, StoreError> {
        let id = self.next_document_id();
        let body = serde_json::to_string(&self.commit_body(&id, record))
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        let url = commit_url(&self.project_id, &self.api_key);

        let response = self.transport.post_json(&url, body).await?;
        if !response.is_success() {
            return Err(StoreError::Status {
                code: response.status,
                body: response.body,
            });
        }

        let reply: Value = serde_json::from_str(&response.body)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        if reply.get("writeResults").is_none() {
            return Err(StoreError::Decode("missing writeResults".to_string()));
        }
        Ok(id)
    }
}

fn lat_lng_value(lat: f64, lng: f64) -> Value {
    json!({
        "mapValue": {
            "fields": {
                "lat": { "doubleValue": lat },
                "lng": { "doubleValue": lng },
            }
        }
    })
}

impl<T: HttpTransport> MessageStore for FirestoreMessageStore<T> {
    async fn save(&self, record: &MessageRecord) -> Result<String, StoreError> {
        match self.commit(record).await {
            Ok(id) => {
                tracing::info!(%id, collection = %self.collection, "message saved");
                Ok(id)
            }
            Err(err) => {
                tracing::error!(error = %err, "error saving message");
                Err(err)
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_transport {
    use gloo_net::http::Request;

    use super::{HttpResponse, HttpTransport};
    use crate::StoreError;

    #[derive(Debug, Default, Clone, Copy)]
    pub struct GlooTransport;

    impl HttpTransport for GlooTransport {
        async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, StoreError> {
            let response = Request::post(url)
                .header("Content-Type", "application/json")
                .body(body)
                .map_err(|e| StoreError::Encode(e.to_string()))?
                .send()
                .await
                .map_err(|e| StoreError::Transport(e.to_string()))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| StoreError::Transport(e.to_string()))?;
            Ok(HttpResponse { status, body })
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_transport::GlooTransport;
