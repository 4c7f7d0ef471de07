//! JSON payload shapes served by the catalog API.

use crate::error::{Error, Result};
use crate::types::{Collection, Item, ItemDetail, MAX_INGREDIENTS, MAX_MEASURES};
use serde::Deserialize;
use std::collections::HashMap;

/// `{"meals": [...]}` or `{"meals": null}`
#[derive(Debug, Deserialize)]
struct CollectionPayload {
    // Required key, nullable value
    #[serde(deserialize_with = "Option::deserialize")]
    meals: Option<Vec<ItemPayload>>,
}

#[derive(Debug, Deserialize)]
struct ItemPayload {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strMealThumb")]
    thumbnail_url: String,
}

#[derive(Debug, Deserialize)]
struct DetailPayload {
    #[serde(deserialize_with = "Option::deserialize")]
    meals: Option<Vec<DetailRecord>>,
}

#[derive(Debug, Deserialize)]
struct DetailRecord {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strCategory")]
    category: String,
    #[serde(rename = "strArea")]
    area: String,
    #[serde(rename = "strInstructions")]
    instructions: String,
    /// Everything else, including the numbered `strIngredientN`/`strMeasureN` slots
    #[serde(flatten)]
    slots: HashMap<String, serde_json::Value>,
}

impl DetailRecord {
    fn slot(&self, prefix: &str, n: usize) -> Option<String> {
        self.slots
            .get(&format!("{prefix}{n}"))
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn into_detail(self) -> ItemDetail {
        let ingredients = (1..=MAX_INGREDIENTS)
            .map(|n| self.slot("strIngredient", n))
            .collect();
        let measures = (1..=MAX_MEASURES)
            .map(|n| self.slot("strMeasure", n))
            .collect();

        ItemDetail {
            id: self.id.into(),
            name: self.name,
            category: self.category,
            area: self.area,
            instructions: self.instructions,
            ingredients,
            measures,
        }
    }
}

/// Decode a collection response body
///
/// A null or empty item list is "no data" and yields `Ok(None)`.
pub(super) fn decode_collection(url: &str, body: &[u8]) -> Result<Option<Collection>> {
    let payload: CollectionPayload =
        serde_json::from_slice(body).map_err(|e| Error::decode(url, e))?;

    let items: Vec<Item> = payload
        .meals
        .unwrap_or_default()
        .into_iter()
        .map(|meal| Item::new(meal.id, meal.name, meal.thumbnail_url))
        .collect();

    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(Collection::new(items)))
}

/// Decode a detail response body, consuming the first record
pub(super) fn decode_details(url: &str, body: &[u8]) -> Result<Option<ItemDetail>> {
    let payload: DetailPayload =
        serde_json::from_slice(body).map_err(|e| Error::decode(url, e))?;

    Ok(payload
        .meals
        .and_then(|records| records.into_iter().next())
        .map(DetailRecord::into_detail))
}
