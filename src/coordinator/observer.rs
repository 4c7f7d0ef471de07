//! Thumbnail-ready notifications.
//!
//! Mutations enqueue the updated item on an unbounded channel while the
//! collection lock is held; a dedicated dispatcher task drains the channel and
//! calls the registered observer. Observers therefore run after the mutation is
//! visible, one at a time, in mutation order, and never under the lock.

use crate::types::Item;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Receives a callback each time the coordinator applies a thumbnail
///
/// Callbacks run on the coordinator's dispatcher task and should return
/// quickly; hand off to another task for anything slow. A panicking callback
/// loses only its own notification.
pub trait ThumbnailObserver: Send + Sync {
    /// The thumbnail of `item` has been set
    fn thumbnail_ready(&self, item: &Item);
}

/// Holds at most one non-owning observer reference
#[derive(Default)]
pub(crate) struct ObserverSlot {
    observer: Mutex<Option<Weak<dyn ThumbnailObserver>>>,
}

impl ObserverSlot {
    pub(crate) fn set(&self, observer: Weak<dyn ThumbnailObserver>) {
        *self.observer.lock().unwrap_or_else(PoisonError::into_inner) = Some(observer);
    }

    pub(crate) fn clear(&self) {
        *self.observer.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The observer, if one is registered and still alive
    fn current(&self) -> Option<Arc<dyn ThumbnailObserver>> {
        self.observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }
}

/// Spawn the dispatcher; it exits once every sender is dropped
pub(crate) fn spawn_dispatcher(
    runtime: &tokio::runtime::Handle,
    slot: Arc<ObserverSlot>,
    mut rx: mpsc::UnboundedReceiver<Item>,
) -> tokio::task::JoinHandle<()> {
    runtime.spawn(async move {
        while let Some(item) = rx.recv().await {
            let Some(observer) = slot.current() else {
                trace!(item_id = %item.id(), "No live observer, notification skipped");
                continue;
            };
            // The dispatcher outlives any single observer.
            if catch_unwind(AssertUnwindSafe(|| observer.thumbnail_ready(&item))).is_err() {
                warn!(item_id = %item.id(), "Observer panicked, notification dropped");
            }
        }
        trace!("Observer dispatcher stopped");
    })
}
