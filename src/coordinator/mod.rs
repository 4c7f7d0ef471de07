//! The collection coordinator.
//!
//! [`CollectionCoordinator`] is the single writer of the item collection. All
//! reads and writes go through one `RwLock`, so no reader ever sees a
//! half-applied mutation and concurrent thumbnail updates never lose writes.
//!
//! - `observer` - single registered observer and its dispatcher task

mod observer;


pub use observer::ThumbnailObserver;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::{HttpGateway, RemoteGateway};
use crate::orchestrator::{FetchOrchestrator, ThumbnailStream};
use crate::types::{Collection, Event, Item, ItemDetail, ItemId, Thumbnail, ThumbnailResult};
use futures::StreamExt;
use observer::ObserverSlot;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast, mpsc};
use tracing::{debug, info};

/// Owner of the item collection (cloneable - all fields are Arc-wrapped)
///
/// Clones share the same collection, observer and event channel.
#[derive(Clone)]
pub struct CollectionCoordinator {
    /// The canonical collection; every access takes this lock
    collection: Arc<RwLock<Collection>>,
    /// Remote data source
    gateway: Arc<dyn RemoteGateway>,
    /// Image fan-out
    orchestrator: FetchOrchestrator,
    /// Configuration (wrapped in Arc for sharing across clones)
    config: Arc<Config>,
    /// Event broadcast channel sender (multiple subscribers supported)
    event_tx: broadcast::Sender<Event>,
    /// Registered observer (non-owning)
    observer: Arc<ObserverSlot>,
    /// Feeds the observer dispatcher task
    notify_tx: mpsc::UnboundedSender<Item>,
}

impl CollectionCoordinator {
    /// Create a coordinator talking HTTP to the configured endpoints
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be built, and [`Error::Other`] outside a Tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        let gateway = HttpGateway::new(&config.http)?;
        Self::with_gateway(config, Arc::new(gateway))
    }

    /// Create a coordinator on top of any [`RemoteGateway`]
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn with_gateway(config: Config, gateway: Arc<dyn RemoteGateway>) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Other(format!("coordinator requires a Tokio runtime: {}", e)))?;

        let (event_tx, _rx) = broadcast::channel(config.fetch.event_capacity);

        let observer = Arc::new(ObserverSlot::default());
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        observer::spawn_dispatcher(&runtime, Arc::clone(&observer), notify_rx);

        let orchestrator = FetchOrchestrator::new(
            Arc::clone(&gateway),
            config.fetch.max_concurrent_images,
            runtime,
        );

        Ok(Self {
            collection: Arc::new(RwLock::new(Collection::default())),
            gateway,
            orchestrator,
            config: Arc::new(config),
            event_tx,
            observer,
            notify_tx,
        })
    }

    /// Snapshot of the current collection
    ///
    /// The snapshot shares item handles with the coordinator, so thumbnails
    /// applied later are visible through it; its order and membership are fixed.
    pub async fn get_collection(&self) -> Collection {
        self.collection.read().await.clone()
    }

    /// Item at `index`, or `None` when out of bounds
    pub async fn get_item(&self, index: usize) -> Option<Item> {
        self.collection.read().await.get(index).cloned()
    }

    /// Item with `id`, or `None` if it is not in the collection
    pub async fn get_item_by_id(&self, id: &ItemId) -> Option<Item> {
        self.collection.read().await.find(id).cloned()
    }

    /// Number of items currently stored
    pub async fn len(&self) -> usize {
        self.collection.read().await.len()
    }

    /// Whether the stored collection is empty
    pub async fn is_empty(&self) -> bool {
        self.collection.read().await.is_empty()
    }

    /// Replace the stored collection wholesale, keeping the given order
    pub async fn set_collection(&self, collection: Collection) {
        let count = collection.len();
        *self.collection.write().await = collection;
        info!(count, "Collection replaced");
        self.emit_event(Event::CollectionReplaced { count });
    }

    /// Set the thumbnail of the item at `index`
    ///
    /// The caller is responsible for having matched `id` to `index`; the id is
    /// not re-checked. On success the observer (if any) is notified and an
    /// [`Event::ThumbnailReady`] is broadcast.
    ///
    /// # Errors
    /// Returns [`Error::PreconditionViolated`] if `index` is out of bounds. The
    /// collection is left untouched.
    pub async fn update_thumbnail(
        &self,
        id: &ItemId,
        image: Thumbnail,
        index: usize,
    ) -> Result<Item> {
        let collection = self.collection.write().await;
        let item = collection
            .get(index)
            .cloned()
            .ok_or_else(|| Error::PreconditionViolated {
                index,
                len: collection.len(),
            })?;

        debug!(item_id = %id, index, "Applying thumbnail");
        self.apply_locked(&item, image, index);
        Ok(item)
    }

    /// Apply a streamed result to the item with the matching id
    ///
    /// Resolves the index and applies the thumbnail under one lock acquisition.
    /// Returns the index that was updated, or `None` if the id is no longer in
    /// the collection (e.g. it was replaced while images were loading).
    pub async fn apply_thumbnail(&self, result: ThumbnailResult) -> Option<usize> {
        let collection = self.collection.write().await;
        let Some((index, item)) = collection
            .iter()
            .enumerate()
            .find(|(_, item)| item.id() == &result.id)
        else {
            debug!(item_id = %result.id, "Thumbnail for item no longer in collection, skipping");
            return None;
        };

        self.apply_locked(item, result.image, index);
        Some(index)
    }

    /// Mutate and notify; callers hold the collection write lock
    fn apply_locked(&self, item: &Item, image: Thumbnail, index: usize) {
        item.set_thumbnail(image);

        // Enqueued under the lock so notifications follow mutation order.
        if self.notify_tx.send(item.clone()).is_err() {
            debug!("Observer dispatcher is gone, notification dropped");
        }
        self.emit_event(Event::ThumbnailReady {
            id: item.id().clone(),
            index,
        });
    }

    /// Register the observer notified after each thumbnail update
    ///
    /// Replaces any previous registration. Only a weak reference is kept: once
    /// the observer is dropped, notifications are skipped silently.
    pub fn register_observer<O>(&self, observer: &Arc<O>)
    where
        O: ThumbnailObserver + 'static,
    {
        let observer: Arc<dyn ThumbnailObserver> = observer.clone();
        self.register_observer_dyn(&observer);
    }

    /// Register an observer that is already type-erased
    ///
    /// Same semantics as [`register_observer`](Self::register_observer).
    pub fn register_observer_dyn(&self, observer: &Arc<dyn ThumbnailObserver>) {
        self.observer.set(Arc::downgrade(observer));
    }

    /// Remove the registered observer, if any
    pub fn clear_observer(&self) {
        self.observer.clear();
    }

    /// Fetch the collection and store it sorted by name
    ///
    /// A response with no items leaves the current collection untouched.
    ///
    /// # Errors
    /// Transport and decode errors are returned unchanged; the collection is
    /// not modified.
    pub async fn populate_collection(&self) -> Result<()> {
        let url = &self.config.endpoints.collection_url;
        match self.gateway.fetch_collection(url).await? {
            Some(mut collection) if !collection.is_empty() => {
                collection.sort_by_name();
                self.set_collection(collection).await;
            }
            _ => info!(url = %url, "Catalog returned no items, keeping current collection"),
        }
        Ok(())
    }

    /// Start fetching thumbnails for a snapshot of the current collection
    ///
    /// See [`FetchOrchestrator::populate_images`] for the stream contract.
    pub async fn populate_images(&self) -> ThumbnailStream {
        let snapshot = self.get_collection().await;
        self.orchestrator.populate_images(&snapshot)
    }

    /// Run a full image cycle: stream thumbnails and apply each one
    ///
    /// Returns the number of thumbnails applied.
    ///
    /// # Errors
    /// Stops at and returns the first transport error from the fan-out.
    /// Thumbnails applied before it stay applied.
    pub async fn load_thumbnails(&self) -> Result<usize> {
        let mut stream = self.populate_images().await;
        let mut applied = 0;

        while let Some(outcome) = stream.next().await {
            let Some(result) = outcome? else {
                continue;
            };
            if self.apply_thumbnail(result).await.is_some() {
                applied += 1;
            }
        }

        info!(applied, "Thumbnail cycle complete");
        Ok(applied)
    }

    /// Fetch the detail record for `item`
    ///
    /// # Errors
    /// Transport and decode errors are returned unchanged.
    pub async fn fetch_details(&self, item: &Item) -> Result<Option<ItemDetail>> {
        let url = self.config.detail_url_for(item.id().as_str())?;
        self.gateway.fetch_details(&url).await
    }

    /// Subscribe to coordinator events
    ///
    /// Each subscriber receives every event sent after it subscribed. Slow
    /// subscribers may observe `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The configuration this coordinator was built with
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    fn emit_event(&self, event: Event) {
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.event_tx.send(event).ok();
    }
}

impl std::fmt::Debug for CollectionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionCoordinator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
