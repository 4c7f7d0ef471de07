//! Catalog walkthrough
//!
//! Plays the part of a list screen and a detail screen:
//! - Populating the collection and printing the rows
//! - Streaming thumbnails and refreshing each row as its image lands
//! - Showing the details of the first item once its thumbnail is ready

use catalog_dl::{CollectionCoordinator, Config, Item, ThumbnailObserver};
use futures::StreamExt;
use std::sync::Arc;

/// Prints when the item it shows gets its thumbnail
struct DetailScreen {
    item: Item,
}

impl ThumbnailObserver for DetailScreen {
    fn thumbnail_ready(&self, item: &Item) {
        if item != &self.item {
            return;
        }
        if let Some(thumb) = self.item.thumbnail() {
            println!(
                "  [detail] {} now shows a {}x{} image",
                self.item.name(),
                thumb.width(),
                thumb.height()
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let coordinator = CollectionCoordinator::new(Config::default())?;

    coordinator.populate_collection().await?;
    let collection = coordinator.get_collection().await;
    println!("{} items:", collection.len());
    for (row, item) in collection.iter().enumerate() {
        println!("  {row:>3}  {}", item.name());
    }

    let Some(first) = coordinator.get_item(0).await else {
        println!("Catalog is empty");
        return Ok(());
    };
    let detail_screen = Arc::new(DetailScreen {
        item: first.clone(),
    });
    coordinator.register_observer(&detail_screen);

    if let Some(detail) = coordinator.fetch_details(&first).await? {
        println!("\n{} ({})", detail.name, detail.subtitle());
        for (ingredient, measure) in detail.ingredient_lines() {
            println!("  - {ingredient}: {}", measure.unwrap_or("to taste"));
        }
        println!();
    }

    let mut thumbnails = coordinator.populate_images().await;
    while let Some(outcome) = thumbnails.next().await {
        match outcome {
            Ok(Some(result)) => {
                let Some(row) = collection.position_of(&result.id) else {
                    continue;
                };
                let item = coordinator
                    .update_thumbnail(&result.id, result.image, row)
                    .await?;
                println!("  row {row:>3} refreshed: {}", item.name());
            }
            Ok(None) => println!("  (one image could not be decoded)"),
            Err(e) => {
                eprintln!("Image loading stopped: {e}");
                break;
            }
        }
    }

    Ok(())
}
