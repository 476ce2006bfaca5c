//! Firestore REST backend.
//!
//! Documents travel as Firestore typed values and are converted to plain
//! JSON fields at this boundary. Live listening is done by polling the
//! collection and pushing a snapshot whenever its contents change.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Number, Value, json};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use cafe::documents::{Document, Fields};

use crate::identity::AuthToken;

use super::{BackendError, CollectionStore, LISTEN_BUFFER, SnapshotStream};

/// Default Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

const PAGE_SIZE: usize = 300;

/// Connection settings for a Firestore project.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// REST endpoint, normally [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Google Cloud project id.
    pub project_id: String,

    /// Web API key sent with every request, if the project requires one.
    pub api_key: Option<String>,

    /// How often listening collections are re-read.
    pub poll_interval: Duration,
}

/// HTTP client for the Firestore documents API.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    config: FirestoreConfig,
    http: Client,
    token: AuthToken,
}

impl FirestoreClient {
    /// Create a client; requests carry `token` as a bearer once it is set.
    #[must_use]
    pub fn new(config: FirestoreConfig, token: AuthToken) -> Self {
        Self {
            config,
            http: Client::new(),
            token,
        }
    }

    /// A store for one collection of this project.
    #[must_use]
    pub fn collection(&self, name: &str) -> FirestoreCollection {
        FirestoreCollection {
            client: self.clone(),
            name: name.to_string(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{collection}",
            self.config.base_url.trim_end_matches('/'),
            self.config.project_id
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.config.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        };

        match self.token.get() {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    /// Read every document of a collection.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn list(&self, collection: &str) -> Result<Vec<Document>, BackendError> {
        let url = self.collection_url(collection);
        let page_size = PAGE_SIZE.to_string();
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .authorize(self.http.get(&url))
                .query(&[("pageSize", page_size.as_str())]);

            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListResponse = expect_success(request.send().await?, "list")
                .await?
                .json()
                .await?;

            for document in page.documents {
                documents.push(document.into_document()?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(documents)
    }

    /// Create a document with a generated id.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn create(&self, collection: &str, fields: Fields) -> Result<String, BackendError> {
        let body = json!({ "fields": encode_fields(fields) });

        let created: FirestoreDocument = expect_success(
            self.authorize(self.http.post(self.collection_url(collection)))
                .json(&body)
                .send()
                .await?,
            "create",
        )
        .await?
        .json()
        .await?;

        Ok(created.id()?.to_string())
    }

    /// Overwrite the given fields of an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when the document does not exist.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), BackendError> {
        let url = format!("{}/{id}", self.collection_url(collection));

        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|field| ("updateMask.fieldPaths", field.clone()))
            .collect();

        query.push(("currentDocument.exists", "true".to_string()));

        let body = json!({ "fields": encode_fields(fields) });

        let response = self
            .authorize(self.http.patch(&url))
            .query(&query)
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(id.to_string()));
        }

        expect_success(response, "update").await?;

        Ok(())
    }

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        let url = format!("{}/{id}", self.collection_url(collection));

        let response = self.authorize(self.http.delete(&url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(id.to_string()));
        }

        expect_success(response, "delete").await?;

        Ok(())
    }
}

async fn expect_success(response: Response, action: &str) -> Result<Response, BackendError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    Err(BackendError::UnexpectedResponse(format!(
        "{action} request failed with status {status}: {text}"
    )))
}

/// One Firestore collection.
#[derive(Debug, Clone)]
pub struct FirestoreCollection {
    client: FirestoreClient,
    name: String,
}

#[async_trait]
impl CollectionStore for FirestoreCollection {
    async fn listen(&self) -> Result<SnapshotStream, BackendError> {
        let first = self.client.list(&self.name).await?;
        let (sender, stream) = mpsc::channel(LISTEN_BUFFER);
        let client = self.client.clone();
        let name = self.name.clone();

        tokio::spawn(async move {
            let mut polls = PollState::new(first.clone());
            let mut ticker = tokio::time::interval(client.config.poll_interval);

            // The first tick completes immediately.
            ticker.tick().await;

            if sender.send(Ok(first)).await.is_err() {
                return;
            }

            loop {
                tokio::select! {
                    () = sender.closed() => break,
                    _ = ticker.tick() => {}
                }

                let polled = client.list(&name).await;

                if let Err(error) = &polled {
                    warn!(collection = %name, %error, "polling failed");
                }

                let Some(message) = polls.observe(polled) else {
                    continue;
                };

                if sender.send(message).await.is_err() {
                    break;
                }
            }

            debug!(collection = %name, "firestore listener stopped");
        });

        Ok(stream)
    }

    async fn create(&self, fields: Fields) -> Result<String, BackendError> {
        self.client.create(&self.name, fields).await
    }

    async fn update(&self, id: &str, fields: Fields) -> Result<(), BackendError> {
        self.client.update(&self.name, id, fields).await
    }

    async fn delete(&self, id: &str) -> Result<(), BackendError> {
        self.client.delete(&self.name, id).await
    }
}

/// Decides which poll results are worth pushing to listeners.
///
/// Unchanged snapshots are skipped, except for the first success after a
/// failure, which has to reach the feed so its error is cleared.
#[derive(Debug)]
struct PollState {
    last: Vec<Document>,
    failed: bool,
}

impl PollState {
    fn new(first: Vec<Document>) -> Self {
        Self {
            last: first,
            failed: false,
        }
    }

    fn observe(
        &mut self,
        polled: Result<Vec<Document>, BackendError>,
    ) -> Option<Result<Vec<Document>, BackendError>> {
        match polled {
            Ok(snapshot) if snapshot == self.last && !self.failed => None,
            Ok(snapshot) => {
                self.failed = false;
                self.last = snapshot;

                Some(Ok(self.last.clone()))
            }
            Err(error) => {
                self.failed = true;

                Some(Err(error))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,

    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,

    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreDocument {
    fn id(&self) -> Result<&str, BackendError> {
        self.name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BackendError::Decode(format!("document name {:?}", self.name)))
    }

    fn into_document(self) -> Result<Document, BackendError> {
        let id = self.id()?.to_string();

        Ok(Document::new(id, decode_fields(&self.fields)))
    }
}

/// Convert plain JSON fields into Firestore typed values.
pub(crate) fn encode_fields(fields: Fields) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| (key, encode_value(value)))
        .collect()
}

fn encode_value(value: Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(value) => json!({ "booleanValue": value }),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => json!({ "integerValue": integer.to_string() }),
            None => json!({ "doubleValue": number }),
        },
        Value::String(value) => json!({ "stringValue": value }),
        Value::Array(values) => json!({
            "arrayValue": { "values": values.into_iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

/// Convert Firestore typed values into plain JSON fields.
pub(crate) fn decode_fields(fields: &Map<String, Value>) -> Fields {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

fn decode_value(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };

    if let Some(value) = typed.get("booleanValue") {
        return value.clone();
    }

    if let Some(value) = typed.get("integerValue") {
        return match value {
            Value::String(text) => text
                .parse::<i64>()
                .map_or(Value::Null, |integer| Value::Number(Number::from(integer))),
            other => other.clone(),
        };
    }

    if let Some(value) = typed.get("doubleValue") {
        return value.clone();
    }

    for key in ["stringValue", "timestampValue", "referenceValue"] {
        if let Some(value) = typed.get(key) {
            return value.clone();
        }
    }

    if let Some(array) = typed.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();

        return Value::Array(values);
    }

    if let Some(map) = typed.get("mapValue") {
        let fields = map
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_default();

        return Value::Object(fields);
    }

    Value::Null
}
