//! In-process backend.
//!
//! Collections live in memory for the lifetime of the process. Each one is
//! a `watch` channel holding the current documents, so every write is
//! immediately visible to all listeners.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::debug;
use uuid::Uuid;

use cafe::documents::{Document, Fields};

use super::{BackendError, CollectionStore, LISTEN_BUFFER, SnapshotStream};

/// The catalog and sales collections of one in-memory shop.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    products: MemoryCollection,
    sales: MemoryCollection,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog collection.
    #[must_use]
    pub fn products(&self) -> MemoryCollection {
        self.products.clone()
    }

    /// The sales collection.
    #[must_use]
    pub fn sales(&self) -> MemoryCollection {
        self.sales.clone()
    }
}

/// One in-memory collection. Clones share the same documents.
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    documents: Arc<watch::Sender<Vec<Document>>>,
}

impl MemoryCollection {
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(watch::Sender::new(Vec::new())),
        }
    }

    /// Current contents, in insertion order.
    #[must_use]
    pub fn documents(&self) -> Vec<Document> {
        self.documents.borrow().clone()
    }

    /// Store a document under a caller-chosen id, replacing any previous one.
    pub fn insert(&self, document: Document) {
        self.documents.send_modify(|documents| {
            match documents.iter_mut().find(|existing| existing.id == document.id) {
                Some(existing) => *existing = document,
                None => documents.push(document),
            }
        });
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionStore for MemoryCollection {
    async fn listen(&self) -> Result<SnapshotStream, BackendError> {
        let mut receiver = self.documents.subscribe();
        let (sender, stream) = mpsc::channel(LISTEN_BUFFER);

        tokio::spawn(async move {
            loop {
                let snapshot = receiver.borrow_and_update().clone();

                if sender.send(Ok(snapshot)).await.is_err() {
                    break;
                }

                tokio::select! {
                    () = sender.closed() => break,
                    changed = receiver.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }

            debug!("in-memory listener stopped");
        });

        Ok(stream)
    }

    async fn create(&self, fields: Fields) -> Result<String, BackendError> {
        let id = Uuid::now_v7().simple().to_string();

        self.insert(Document::new(id.clone(), fields));

        Ok(id)
    }

    async fn update(&self, id: &str, fields: Fields) -> Result<(), BackendError> {
        let found = self.documents.send_if_modified(|documents| {
            let Some(document) = documents.iter_mut().find(|document| document.id == id) else {
                return false;
            };

            document.fields.extend(fields);

            true
        });

        if found {
            Ok(())
        } else {
            Err(BackendError::NotFound(id.to_string()))
        }
    }

    async fn delete(&self, id: &str) -> Result<(), BackendError> {
        let removed = self.documents.send_if_modified(|documents| {
            let before = documents.len();

            documents.retain(|document| document.id != id);

            documents.len() != before
        });

        if removed {
            Ok(())
        } else {
            Err(BackendError::NotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn fields(name: &str) -> Fields {
        let mut fields = Fields::new();

        fields.insert("name".to_string(), json!(name));

        fields
    }

    #[tokio::test]
    async fn listen_starts_with_current_snapshot() -> TestResult {
        let collection = MemoryCollection::new();

        collection.create(fields("Latte")).await?;

        let mut stream = collection.listen().await?;
        let first = stream.recv().await.ok_or("stream closed")??;

        assert_eq!(first.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn writes_push_new_snapshots() -> TestResult {
        let collection = MemoryCollection::new();
        let mut stream = collection.listen().await?;

        let initial = stream.recv().await.ok_or("stream closed")??;

        assert!(initial.is_empty());

        let id = collection.create(fields("Latte")).await?;
        let created = stream.recv().await.ok_or("stream closed")??;

        assert_eq!(created.first().map(|d| d.id.as_str()), Some(id.as_str()));

        collection.update(&id, fields("Flat White")).await?;
        let updated = stream.recv().await.ok_or("stream closed")??;

        assert_eq!(
            updated.first().and_then(|d| d.fields.get("name")),
            Some(&json!("Flat White"))
        );

        collection.delete(&id).await?;
        let deleted = stream.recv().await.ok_or("stream closed")??;

        assert!(deleted.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_fail() {
        let collection = MemoryCollection::new();

        let update = collection.update("nope", fields("x")).await;
        let delete = collection.delete("nope").await;

        assert!(
            matches!(update, Err(BackendError::NotFound(_))),
            "expected NotFound, got {update:?}"
        );
        assert!(
            matches!(delete, Err(BackendError::NotFound(_))),
            "expected NotFound, got {delete:?}"
        );
    }

    #[tokio::test]
    async fn update_merges_fields() -> TestResult {
        let collection = MemoryCollection::new();
        let id = collection.create(fields("Latte")).await?;

        let mut stock = Fields::new();
        stock.insert("inStock".to_string(), json!(false));

        collection.update(&id, stock).await?;

        let documents = collection.documents();
        let document = documents.first().ok_or("missing document")?;

        assert_eq!(document.fields.get("name"), Some(&json!("Latte")));
        assert_eq!(document.fields.get("inStock"), Some(&json!(false)));

        Ok(())
    }
}
