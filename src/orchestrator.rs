//! Concurrent thumbnail fan-out.
//!
//! [`FetchOrchestrator::populate_images`] starts one image fetch per item and
//! returns a [`ThumbnailStream`] that yields each outcome as soon as it
//! completes. Emission order is completion order, not collection order.
//!
//! The fan-out is all-or-nothing on transport errors: the first failing fetch
//! is yielded as `Err`, the remaining fetches are dropped and the stream ends.
//! An image that downloads but does not decode is yielded as `Ok(None)` and
//! does not affect its siblings.

use crate::error::Result;
use crate::gateway::RemoteGateway;
use crate::types::{Collection, Item, ThumbnailResult};
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

/// One outcome of the fan-out: a decoded thumbnail, an empty slot, or the fatal error
pub type ThumbnailOutcome = Result<Option<ThumbnailResult>>;

/// Launches per-item image fetches against a [`RemoteGateway`]
#[derive(Clone)]
pub struct FetchOrchestrator {
    gateway: Arc<dyn RemoteGateway>,
    max_concurrent: Option<usize>,
    runtime: Handle,
}

impl FetchOrchestrator {
    /// Create an orchestrator whose fan-outs run on `runtime`
    ///
    /// `max_concurrent` bounds the number of in-flight requests; `None` starts
    /// every fetch at once.
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        max_concurrent: Option<usize>,
        runtime: Handle,
    ) -> Self {
        Self {
            gateway,
            max_concurrent,
            runtime,
        }
    }

    /// Fetch thumbnails for every item in `collection`
    ///
    /// The fan-out runs on a task spawned on the orchestrator's runtime, so
    /// this may be called from any thread. The returned stream yields exactly
    /// one outcome per item unless a transport error ends it early. Dropping
    /// the stream cancels the fetches that are still running.
    pub fn populate_images(&self, collection: &Collection) -> ThumbnailStream {
        let items: Vec<Item> = collection.iter().cloned().collect();
        let total = items.len();
        let width = self.max_concurrent.unwrap_or(total).max(1);

        // One slot per item: the fan-out task never waits on a slow consumer.
        let (tx, rx) = mpsc::channel(total.max(1));
        let cancel = CancellationToken::new();

        self.runtime.spawn(run_fan_out(FanOut {
            gateway: Arc::clone(&self.gateway),
            items,
            width,
            tx,
            cancel: cancel.clone(),
        }));

        debug!(items = total, width, "Started thumbnail fan-out");

        ThumbnailStream {
            inner: ReceiverStream::new(rx),
            _cancel_on_drop: cancel.drop_guard(),
        }
    }
}

/// Parameters for one fan-out run
struct FanOut {
    gateway: Arc<dyn RemoteGateway>,
    items: Vec<Item>,
    width: usize,
    tx: mpsc::Sender<ThumbnailOutcome>,
    cancel: CancellationToken,
}

async fn run_fan_out(params: FanOut) {
    let FanOut {
        gateway,
        items,
        width,
        tx,
        cancel,
    } = params;
    let total = items.len();

    let mut fetches = stream::iter(items)
        .map(|item| {
            let gateway = Arc::clone(&gateway);
            async move { fetch_thumbnail(gateway.as_ref(), &item).await }
        })
        .buffer_unordered(width);

    let mut emitted = 0usize;
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(emitted, total, "Thumbnail stream dropped, abandoning fan-out");
                return;
            }
            next = fetches.next() => next,
        };

        match next {
            Some(Ok(slot)) => {
                emitted += 1;
                if tx.send(Ok(slot)).await.is_err() {
                    debug!(emitted, total, "Thumbnail consumer went away");
                    return;
                }
            }
            Some(Err(e)) => {
                warn!(error = %e, code = e.error_code(), emitted, total, "Image fetch failed, aborting fan-out");
                // Dropping `fetches` on return cancels the siblings still in flight.
                if tx.send(Err(e)).await.is_err() {
                    debug!(emitted, total, "Thumbnail consumer went away");
                }
                return;
            }
            None => break,
        }
    }

    info!(total, "Thumbnail fan-out complete");
}

async fn fetch_thumbnail(gateway: &dyn RemoteGateway, item: &Item) -> ThumbnailOutcome {
    let image = gateway.fetch_image(item.thumbnail_url()).await?;
    if image.is_none() {
        debug!(item_id = %item.id(), "No usable image for item");
    }
    Ok(image.map(|image| ThumbnailResult {
        id: item.id().clone(),
        image,
    }))
}

/// Thumbnails in completion order
///
/// Finite and single-use. Ends after one outcome per item, or right after the
/// first `Err`. Dropping it cancels outstanding fetches.
pub struct ThumbnailStream {
    inner: ReceiverStream<ThumbnailOutcome>,
    _cancel_on_drop: DropGuard,
}

impl Stream for ThumbnailStream {
    type Item = ThumbnailOutcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl std::fmt::Debug for ThumbnailStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailStream").finish_non_exhaustive()
    }
}
