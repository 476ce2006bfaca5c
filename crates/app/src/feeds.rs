//! Live feeds
//!
//! A feed owns a background task that listens to a collection and keeps a
//! [`FeedState`] current. Readers hold a `watch` receiver over that state.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error};

use cafe::{
    documents::{Document, decode_product, decode_sale},
    feed::FeedState,
    products::Product,
    sales::SaleRecord,
};

use crate::{
    backend::{CatalogStore, CollectionStore, SalesStore},
    errors::AppError,
};

/// Live view over the product collection.
pub type CatalogFeed = Feed<Product>;

/// Live view over the sales collection.
pub type SalesFeed = Feed<SaleRecord>;

/// Handle to a running listener. Dropping it stops the listener.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stop listening.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Whether the listener task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A live, read-only view over an external collection.
#[derive(Debug)]
pub struct Feed<T> {
    state: watch::Receiver<FeedState<T>>,
    subscription: Subscription,
}

impl<T> Feed<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start listening to `store`, decoding each document with `decode`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn subscribe(
        store: Arc<dyn CollectionStore>,
        label: &'static str,
        decode: fn(&Document) -> T,
    ) -> Self {
        let (sender, state) = watch::channel(FeedState::new());

        let handle = tokio::spawn(listen(store, sender, label, decode));

        Self {
            state,
            subscription: Subscription { handle },
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> FeedState<T> {
        self.state.borrow().clone()
    }

    /// Current items.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items().to_vec()
    }

    /// A receiver for observers that want their own change notifications.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<FeedState<T>> {
        self.state.clone()
    }

    /// Wait for the next update and return the new state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Subscription`] if the listener has stopped.
    pub async fn changed(&mut self) -> Result<FeedState<T>, AppError> {
        self.state
            .changed()
            .await
            .map_err(|_err| AppError::Subscription("feed listener stopped".to_string()))?;

        Ok(self.state.borrow_and_update().clone())
    }

    /// Wait until the first snapshot or error has been applied.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Subscription`] if the listener stopped before
    /// anything arrived.
    pub async fn wait_until_loaded(&mut self) -> Result<FeedState<T>, AppError> {
        let state = self
            .state
            .wait_for(|state| !state.loading())
            .await
            .map_err(|_err| AppError::Subscription("feed listener stopped".to_string()))?;

        Ok(state.clone())
    }

    /// Stop listening and keep the last state.
    pub fn unsubscribe(self) -> FeedState<T> {
        let state = self.state();

        self.subscription.unsubscribe();

        state
    }
}

impl CatalogFeed {
    /// Live product catalog.
    #[must_use]
    pub fn catalog(store: CatalogStore) -> Self {
        Self::subscribe(store, "products", decode_product)
    }
}

impl SalesFeed {
    /// Live sales record.
    #[must_use]
    pub fn sales(store: SalesStore) -> Self {
        Self::subscribe(store, "sales", decode_sale)
    }
}

async fn listen<T>(
    store: Arc<dyn CollectionStore>,
    sender: watch::Sender<FeedState<T>>,
    label: &'static str,
    decode: fn(&Document) -> T,
) {
    let mut stream = match store.listen().await {
        Ok(stream) => stream,
        Err(err) => {
            error!(feed = label, error = %err, "subscription failed");

            sender.send_modify(|state| state.apply_error(format!("could not load {label}")));

            return;
        }
    };

    while let Some(message) = stream.recv().await {
        match message {
            Ok(documents) => {
                let items: Vec<T> = documents.iter().map(decode).collect();

                debug!(feed = label, count = items.len(), "snapshot received");

                sender.send_modify(|state| state.apply_snapshot(items));
            }
            Err(err) => {
                error!(feed = label, error = %err, "subscription failed");

                sender.send_modify(|state| state.apply_error(format!("could not load {label}")));
            }
        }

        if sender.is_closed() {
            break;
        }
    }

    debug!(feed = label, "feed stopped");
}
