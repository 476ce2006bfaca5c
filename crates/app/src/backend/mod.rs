//! Backend
//!
//! The external collections the storefront reads and writes. Every store is
//! a [`CollectionStore`]; the catalog and the sales record are two
//! instances of it.

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::mpsc;

use cafe::documents::{Document, Fields};

mod errors;
pub mod firestore;
pub mod memory;

pub use errors::BackendError;

/// Buffered snapshots between a listener task and its feed.
pub(crate) const LISTEN_BUFFER: usize = 16;

/// Snapshots pushed by a listening collection. The first message is the
/// current contents; later messages arrive whenever the collection changes.
pub type SnapshotStream = mpsc::Receiver<Result<Vec<Document>, BackendError>>;

/// The `products` collection.
pub type CatalogStore = Arc<dyn CollectionStore>;

/// The `ventas` collection.
pub type SalesStore = Arc<dyn CollectionStore>;

#[automock]
#[async_trait]
pub trait CollectionStore: Debug + Send + Sync {
    /// Start a live snapshot stream. Dropping the stream stops listening.
    async fn listen(&self) -> Result<SnapshotStream, BackendError>;

    /// Append a document and return its generated id.
    async fn create(&self, fields: Fields) -> Result<String, BackendError>;

    /// Overwrite the given fields of an existing document.
    async fn update(&self, id: &str, fields: Fields) -> Result<(), BackendError>;

    /// Delete a document.
    async fn delete(&self, id: &str) -> Result<(), BackendError>;
}
