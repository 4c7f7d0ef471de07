//! Core types for catalog-dl

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Stable identifier of a catalog item
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create a new ItemId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded thumbnail bitmap
///
/// Cloning is cheap: the pixel buffer is shared. Two thumbnails are the
/// "same" image only if they share a buffer, see [`Thumbnail::ptr_eq`].
#[derive(Clone)]
pub struct Thumbnail(Arc<image::DynamicImage>);

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.0.width())
            .field("height", &self.0.height())
            .finish()
    }
}

impl Thumbnail {
    /// Wrap an already decoded image
    pub fn new(image: image::DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    /// Decode raw bytes into a thumbnail
    ///
    /// Returns `None` for empty or undecodable input; a broken image is not an error.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        image::load_from_memory(bytes).ok().map(Self::new)
    }

    /// Access the decoded image
    pub fn image(&self) -> &image::DynamicImage {
        &self.0
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Whether both handles point at the same decoded buffer
    pub fn ptr_eq(&self, other: &Thumbnail) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug)]
struct ItemInner {
    id: ItemId,
    name: String,
    thumbnail_url: String,
    thumbnail: RwLock<Option<Thumbnail>>,
}

/// One catalog entry
///
/// `Item` is a shared handle: clones refer to the same entry, so a handle kept
/// by a detail view observes the thumbnail once the coordinator sets it.
/// Equality and hashing use the id only.
#[derive(Clone, Debug)]
pub struct Item(Arc<ItemInner>);

impl Item {
    /// Create an item without a thumbnail
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self(Arc::new(ItemInner {
            id: id.into(),
            name: name.into(),
            thumbnail_url: thumbnail_url.into(),
            thumbnail: RwLock::new(None),
        }))
    }

    /// Item identity
    pub fn id(&self) -> &ItemId {
        &self.0.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Remote thumbnail location
    pub fn thumbnail_url(&self) -> &str {
        &self.0.thumbnail_url
    }

    /// Current thumbnail, if it has been loaded
    pub fn thumbnail(&self) -> Option<Thumbnail> {
        self.0
            .thumbnail
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a thumbnail has been loaded
    pub fn has_thumbnail(&self) -> bool {
        self.0
            .thumbnail
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether both handles refer to the same entry (not just the same id)
    pub fn ptr_eq(&self, other: &Item) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // Only the coordinator writes thumbnails, under its collection lock.
    pub(crate) fn set_thumbnail(&self, thumbnail: Thumbnail) {
        *self
            .0
            .thumbnail
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(thumbnail);
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Item {}

impl std::hash::Hash for Item {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

/// Ordered, position-addressable sequence of items
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collection {
    items: Vec<Item>,
}

impl Collection {
    /// Create a collection preserving the given order
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`, or `None` when out of bounds
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Items in display order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Iterate over items in display order
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Position of the item with `id`
    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Item with `id`
    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Sort alphabetically by name, ignoring case
    ///
    /// The sort is stable, so names that compare equal keep their fetched order.
    pub fn sort_by_name(&mut self) {
        self.items
            .sort_by_cached_key(|item| item.name().to_lowercase());
    }

    /// Consume into the underlying items
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

impl From<Vec<Item>> for Collection {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A successfully decoded thumbnail for the item with `id`
#[derive(Clone, Debug)]
pub struct ThumbnailResult {
    /// Id of the item the image belongs to
    pub id: ItemId,
    /// The decoded image
    pub image: Thumbnail,
}

/// Maximum number of ingredient slots in a detail record
pub const MAX_INGREDIENTS: usize = 11;

/// Maximum number of measure slots in a detail record
pub const MAX_MEASURES: usize = 13;

/// Richer read-only record for one item, fetched on demand
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    /// Item identity
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Catalog category (e.g. "Dessert")
    pub category: String,
    /// Regional origin (e.g. "British")
    pub area: String,
    /// Free-form preparation text
    pub instructions: String,
    /// Ingredient slots in order; always `MAX_INGREDIENTS` long, empty slots are `None`
    pub ingredients: Vec<Option<String>>,
    /// Measure slots in order; always `MAX_MEASURES` long, empty slots are `None`
    pub measures: Vec<Option<String>>,
}

impl ItemDetail {
    /// `"<category> - <area>"`, as shown under the detail title
    pub fn subtitle(&self) -> String {
        format!("{} - {}", self.category, self.area)
    }

    /// Present ingredients paired positionally with their measure
    ///
    /// Empty ingredient slots are skipped; a missing measure yields `None`.
    pub fn ingredient_lines(&self) -> Vec<(&str, Option<&str>)> {
        self.ingredients
            .iter()
            .enumerate()
            .filter_map(|(slot, ingredient)| {
                let ingredient = ingredient.as_deref()?;
                let measure = self.measures.get(slot).and_then(|m| m.as_deref());
                Some((ingredient, measure))
            })
            .collect()
    }
}

/// Event emitted by the coordinator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The stored collection was replaced wholesale
    CollectionReplaced {
        /// Number of items in the new collection
        count: usize,
    },

    /// A thumbnail was applied to the item at `index`
    ThumbnailReady {
        /// Item id
        id: ItemId,
        /// Position of the item in the collection
        index: usize,
    },
}
