//! End-to-end listing scenarios driven through the public router.
//!
//! Listings live in the in-memory repository; image hosting is either a local
//! stub or the Cloudinary client pointed at a mock server.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use origin_homes::config::MediaConfig;
use origin_homes::listings::{
    property_router, ImagePayload, ListingKind, ListingService, MediaError, MediaStore,
    UploadedImage,
};
use origin_homes::media::CloudinaryClient;
use origin_homes::storage::InMemoryListingRepository;

const BOUNDARY: &str = "lifecycle-boundary";
const SELLER: &str = "1d6f8b2e-4c3a-4e59-9b7d-2a6c8e0f1b3d";

#[derive(Default)]
struct StubMedia {
    destroyed: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaStore for StubMedia {
    async fn upload(&self, image: ImagePayload) -> Result<UploadedImage, MediaError> {
        Ok(UploadedImage {
            secure_url: format!(
                "https://res.cloudinary.com/demo/image/upload/v42/listings/{}",
                image.file_name
            ),
            public_id: format!("listings/{}", image.file_name),
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        self.destroyed
            .lock()
            .expect("destroy log poisoned")
            .push(public_id.to_string());
        Ok(())
    }
}

fn router_with<M: MediaStore + 'static>(media: Arc<M>) -> Router {
    property_router(
        Arc::new(ListingService::new(
            ListingKind::Sale,
            Arc::new(InMemoryListingRepository::new()),
            media.clone(),
        )),
        Arc::new(ListingService::new(
            ListingKind::Rental,
            Arc::new(InMemoryListingRepository::new()),
            media,
        )),
    )
}

fn multipart(fields: &[(&str, &str)], image: Option<&str>) -> Vec<u8> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some(file_name) = image {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"propertyImage\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\npng-bytes\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body.into_bytes()
}

fn listing_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("sellerId", SELLER),
        ("ownerName", "Sita Sharma"),
        ("propertyLocation", "Lalitpur"),
        ("propertyType", "Apartment"),
        ("propertyTitle", "Sunny Two Bedroom"),
        ("phoneNumber", "9841000000"),
        ("price", "18500.5"),
        ("description", "Close to the ring road"),
        ("propertyFeatures", "Balcony, parking"),
    ]
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Vec<u8>>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(bytes) => {
            request = request.header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
            Body::from(bytes)
        }
        None => Body::empty(),
    };
    router
        .clone()
        .oneshot(request.body(body).expect("request builds"))
        .await
        .expect("router responds")
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

#[tokio::test]
async fn rental_listing_lives_through_its_whole_lifecycle() {
    let media = Arc::new(StubMedia::default());
    let router = router_with(media.clone());

    let created = send(
        &router,
        "POST",
        "/rental/rentout",
        Some(multipart(&listing_fields(), Some("flat.png"))),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = json_body(created).await;
    let id = created["property"]["id"]
        .as_str()
        .expect("id assigned")
        .to_string();
    assert_eq!(created["property"]["price"], json!("18500.50"));
    assert_eq!(created["property"]["description"], json!("Close to the ring road"));

    let unsold = json_body(send(&router, "GET", "/rental/unsold", None).await).await;
    assert_eq!(unsold.as_array().map(Vec::len), Some(1));
    let sale_unsold = json_body(send(&router, "GET", "/property/unsold", None).await).await;
    assert_eq!(sale_unsold, json!([]));

    let updated = send(
        &router,
        "PUT",
        &format!("/rental/update/{id}"),
        Some(multipart(&[("price", "19000")], Some("flat-new.png"))),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = json_body(updated).await;
    assert_eq!(updated["property"]["price"], json!("19000.00"));
    assert_eq!(
        updated["property"]["propertyImage"],
        json!("https://res.cloudinary.com/demo/image/upload/v42/listings/flat-new.png")
    );
    assert_eq!(updated["property"]["ownerName"], json!("Sita Sharma"));

    let rented = json_body(send(&router, "PUT", &format!("/rental/rent/{id}"), None).await).await;
    assert_eq!(rented["property"]["status"], json!("rented"));
    let unsold = json_body(send(&router, "GET", "/rental/unsold", None).await).await;
    assert_eq!(unsold, json!([]));

    let by_seller =
        json_body(send(&router, "GET", &format!("/rental/seller/{SELLER}"), None).await).await;
    assert_eq!(by_seller["property"][0]["status"], json!("rented"));

    let deleted = send(&router, "DELETE", &format!("/rental/delete/{id}"), None).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(
        *media.destroyed.lock().expect("destroy log poisoned"),
        vec!["listings/flat-new.png".to_string()]
    );

    let again = send(&router, "DELETE", &format!("/rental/delete/{id}"), None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

fn media_config(api_base: String) -> MediaConfig {
    MediaConfig {
        cloud_name: "demo".to_string(),
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
        folder: "real_state_property_images".to_string(),
        api_base,
    }
}

#[tokio::test]
async fn sale_listing_uploads_through_cloudinary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v7/real_state_property_images/house.png",
            "public_id": "real_state_property_images/house",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CloudinaryClient::new(media_config(server.uri())).expect("client builds");
    let router = router_with(Arc::new(client));

    let response = send(
        &router,
        "POST",
        "/property/sell",
        Some(multipart(&listing_fields(), Some("house.png"))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = json_body(response).await;
    assert_eq!(
        payload["property"]["propertyImage"],
        json!("https://res.cloudinary.com/demo/image/upload/v7/real_state_property_images/house.png")
    );
}

#[tokio::test]
async fn rejected_upload_is_a_generic_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = CloudinaryClient::new(media_config(server.uri())).expect("client builds");
    let router = router_with(Arc::new(client));

    let response = send(
        &router,
        "POST",
        "/property/sell",
        Some(multipart(&listing_fields(), Some("house.png"))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "error": "Failed to list property" })
    );
    let unsold = json_body(send(&router, "GET", "/property/unsold", None).await).await;
    assert_eq!(unsold, json!([]));
}
