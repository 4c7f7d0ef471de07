//! Catalog payloads and image fixtures

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One catalog entry as served by the mock: (id, name, image path)
pub struct Entry {
    pub id: &'static str,
    pub name: &'static str,
    pub image_path: &'static str,
}

/// Unsorted dessert catalog
pub const DESSERTS: &[Entry] = &[
    Entry {
        id: "52893",
        name: "Banana Pancakes",
        image_path: "/images/banana.png",
    },
    Entry {
        id: "52768",
        name: "apple Frangipan Tart",
        image_path: "/images/apple.png",
    },
    Entry {
        id: "52767",
        name: "Bakewell tart",
        image_path: "/images/bakewell.png",
    },
    Entry {
        id: "53049",
        name: "Chocolate Gateau",
        image_path: "/images/gateau.png",
    },
];

/// Encode a blank RGB image as PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encoding failed");
    bytes
}

/// Collection payload for `entries`, image URLs rooted at `server`
pub fn collection_body(server: &MockServer, entries: &[Entry]) -> String {
    let meals: Vec<serde_json::Value> = entries
        .iter()
        .map(|entry| {
            serde_json::json!({
                "strMeal": entry.name,
                "strMealThumb": format!("{}{}", server.uri(), entry.image_path),
                "idMeal": entry.id,
            })
        })
        .collect();
    serde_json::json!({ "meals": meals }).to_string()
}

/// Serve the catalog listing
pub async fn mount_collection(server: &MockServer, entries: &[Entry]) {
    Mock::given(method("GET"))
        .and(path("/api/filter.php"))
        .and(query_param("c", "Dessert"))
        .respond_with(ResponseTemplate::new(200).set_body_string(collection_body(server, entries)))
        .mount(server)
        .await;
}

/// Serve a decodable PNG for every entry
pub async fn mount_images(server: &MockServer, entries: &[Entry]) {
    for (i, entry) in entries.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(entry.image_path))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(i as u32 + 1, 1)))
            .mount(server)
            .await;
    }
}

/// Serve one image path with an arbitrary response
pub async fn mount_image_response(server: &MockServer, image_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(response)
        .mount(server)
        .await;
}
