//! Shared test helpers: image fixtures and an in-memory gateway.

use crate::error::{Error, Result};
use crate::gateway::RemoteGateway;
use crate::types::{Collection, Item, ItemDetail, Thumbnail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Encode a blank RGB image of the given size as PNG
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Build `n` items named "Item <i>" with image URLs `mem://img/<i>`
pub(crate) fn numbered_items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item::new(i.to_string(), format!("Item {i}"), image_url(i)))
        .collect()
}

pub(crate) fn image_url(i: usize) -> String {
    format!("mem://img/{i}")
}

/// How the fake gateway answers one image URL
#[derive(Clone, Debug)]
pub(crate) enum ImageReply {
    /// Decodable image of the given width, after an optional delay
    Image { width: u32, delay: Duration },
    /// Bytes that do not decode
    Undecodable,
    /// Transport failure after an optional delay
    Fail { delay: Duration },
    /// Never completes
    Hang,
}

impl ImageReply {
    pub(crate) fn image(width: u32) -> Self {
        ImageReply::Image {
            width,
            delay: Duration::ZERO,
        }
    }
}

/// In-memory [`RemoteGateway`] with scripted replies
#[derive(Default)]
pub(crate) struct FakeGateway {
    collection: Mutex<Option<Result<Option<Collection>>>>,
    images: Mutex<HashMap<String, ImageReply>>,
    details: Mutex<HashMap<String, ItemDetail>>,
    pub(crate) image_calls: AtomicUsize,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) max_in_flight: AtomicUsize,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reply to the next collection fetch with these items
    pub(crate) fn with_collection(self, items: Vec<Item>) -> Self {
        *self.collection.lock().unwrap() = Some(Ok(Some(Collection::new(items))));
        self
    }

    /// Reply to the next collection fetch with "no data"
    pub(crate) fn with_empty_collection(self) -> Self {
        *self.collection.lock().unwrap() = Some(Ok(None));
        self
    }

    /// Reply to the next collection fetch with a transport error
    pub(crate) fn with_collection_error(self) -> Self {
        *self.collection.lock().unwrap() =
            Some(Err(Error::transport("mem://collection", "connection reset")));
        self
    }

    pub(crate) fn with_image(self, url: impl Into<String>, reply: ImageReply) -> Self {
        self.images.lock().unwrap().insert(url.into(), reply);
        self
    }

    pub(crate) fn with_detail(self, url: impl Into<String>, detail: ItemDetail) -> Self {
        self.details.lock().unwrap().insert(url.into(), detail);
        self
    }
}

/// Decrements the in-flight counter when a fetch finishes or is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn fetch_collection(&self, _url: &str) -> Result<Option<Collection>> {
        self.collection
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(None))
    }

    async fn fetch_image(&self, url: &str) -> Result<Option<Thumbnail>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let reply = self
            .images
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(ImageReply::image(1));

        match reply {
            ImageReply::Image { width, delay } => {
                tokio::time::sleep(delay).await;
                Ok(Thumbnail::decode(&png_bytes(width, 1)))
            }
            ImageReply::Undecodable => Ok(Thumbnail::decode(b"not an image")),
            ImageReply::Fail { delay } => {
                tokio::time::sleep(delay).await;
                Err(Error::transport(url, "HTTP 503"))
            }
            ImageReply::Hang => std::future::pending().await,
        }
    }

    async fn fetch_details(&self, url: &str) -> Result<Option<ItemDetail>> {
        Ok(self.details.lock().unwrap().get(url).cloned())
    }
}
