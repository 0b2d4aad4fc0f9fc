//! Tests for gallery photo handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockGalleryQuery;
use crate::inbound::http::test_utils::{
    FixtureHttp, FormPart, fixture_http, multipart_body, test_app,
};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

#[fixture]
fn fixture() -> FixtureHttp {
    fixture_http(64)
}

fn upload_request(parts: &[FormPart<'_>]) -> actix_test::TestRequest {
    let (content_type, body) = multipart_body(parts);
    actix_test::TestRequest::post()
        .uri("/api/v1/photos/upload")
        .insert_header(("content-type", content_type))
        .set_payload(body)
}

#[rstest]
#[actix_web::test]
async fn upload_stores_objects_and_returns_record(fixture: FixtureHttp) {
    let FixtureHttp {
        state,
        store,
        publisher,
        ..
    } = fixture;
    let app = actix_test::init_service(test_app(state)).await;

    let request = upload_request(&[
        FormPart::file("photo", "image/png", PNG_BYTES),
        FormPart::text("title", "  Primer baile "),
        FormPart::text("tags", "venue, ceremony/vows"),
        FormPart::text("metadata", r#"{"camera":"X100"}"#),
    ])
    .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["title"], "Primer baile");
    assert_eq!(body["tags"], json!(["venue", "ceremony/vows"]));
    assert_eq!(body["metadata"], json!({"camera": "X100"}));
    let id = body["id"].as_str().expect("id is a string");
    assert_eq!(
        store.keys(),
        [
            format!("photos/{id}/original.png"),
            format!("photos/{id}/thumb.jpg")
        ]
    );
    assert_eq!(
        body["imageUrlThumb"],
        format!("memory://photos/{id}/thumb.jpg")
    );
    assert!(publisher.names().contains(&"new_photo"));
}

#[rstest]
#[actix_web::test]
async fn oversized_upload_is_rejected_before_storage(fixture: FixtureHttp) {
    let FixtureHttp { state, store, .. } = fixture;
    let app = actix_test::init_service(test_app(state)).await;
    let oversized = vec![0_u8; 65];

    let request =
        upload_request(&[FormPart::file("photo", "image/jpeg", &oversized)]).to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "payload_too_large");
    assert!(store.keys().is_empty());
}

#[rstest]
#[case::not_an_image(
    vec![FormPart::file("photo", "text/plain", b"hello")],
    StatusCode::UNSUPPORTED_MEDIA_TYPE
)]
#[case::missing_photo(vec![FormPart::text("title", "sin foto")], StatusCode::BAD_REQUEST)]
#[case::bad_metadata(
    vec![
        FormPart::file("photo", "image/png", PNG_BYTES),
        FormPart::text("metadata", "[1,2]"),
    ],
    StatusCode::BAD_REQUEST
)]
#[actix_web::test]
async fn rejected_uploads_store_nothing(
    fixture: FixtureHttp,
    #[case] parts: Vec<FormPart<'static>>,
    #[case] expected: StatusCode,
) {
    let FixtureHttp { state, store, .. } = fixture;
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(&app, upload_request(&parts).to_request()).await;

    assert_eq!(response.status(), expected);
    assert!(store.keys().is_empty());
}

#[rstest]
#[actix_web::test]
async fn registration_ignores_client_id(fixture: FixtureHttp) {
    let app = actix_test::init_service(test_app(fixture.state)).await;
    let client_id = "00000000-0000-0000-0000-000000000001";

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/photos")
        .set_json(json!({
            "id": client_id,
            "imageUrl": "https://cdn.example/a.jpg",
            "title": "Brindis",
            "tags": ["party"]
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_ne!(body["id"], client_id);
    assert_eq!(body["imageUrl"], "https://cdn.example/a.jpg");
    assert_eq!(body["imageUrlThumb"], "https://cdn.example/a.jpg");
    assert!(body.get("title").is_none());
}

#[rstest]
#[actix_web::test]
async fn registration_without_url_is_rejected(fixture: FixtureHttp) {
    let app = actix_test::init_service(test_app(fixture.state)).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/photos")
        .set_json(json!({"title": "sin url"}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn registration(url: &str, tags: &[&str]) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/v1/photos")
        .set_json(json!({"imageUrl": url, "tags": tags}))
}

#[rstest]
#[actix_web::test]
async fn listing_paginates_and_filters_by_exact_tag(fixture: FixtureHttp) {
    let app = actix_test::init_service(test_app(fixture.state)).await;
    let photos = [
        ("https://cdn.example/0.jpg", "venue"),
        ("https://cdn.example/1.jpg", "venue"),
        ("https://cdn.example/2.jpg", "venue"),
        ("https://cdn.example/vows.jpg", "ceremony/vows"),
    ];
    for (url, tag) in photos {
        let response = actix_test::call_service(&app, registration(url, &[tag]).to_request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let page: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/photos?page=2&limit=2")
            .to_request(),
    )
    .await;
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        page["pagination"],
        json!({"total": 4, "totalPages": 2, "currentPage": 2, "limit": 2})
    );

    let filtered: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/photos?tag=ceremony")
            .to_request(),
    )
    .await;
    assert_eq!(filtered["pagination"]["total"], 0);
}

#[rstest]
#[case::zero_page("/api/v1/photos?page=0")]
#[case::negative_page("/api/v1/photos?page=-1")]
#[case::limit_too_large("/api/v1/photos?limit=101")]
#[actix_web::test]
async fn invalid_page_requests_are_rejected(fixture: FixtureHttp, #[case] uri: &str) {
    let app = actix_test::init_service(test_app(fixture.state)).await;
    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn category_counts_use_main_category(fixture: FixtureHttp) {
    let app = actix_test::init_service(test_app(fixture.state)).await;
    let photos: [(&str, &[&str]); 2] = [
        ("https://cdn.example/a.jpg", &["ceremony/vows", "party"]),
        ("https://cdn.example/b.jpg", &["ceremony/rings"]),
    ];
    for (url, tags) in photos {
        let response = actix_test::call_service(&app, registration(url, tags).to_request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let counts: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/photos/stats/count-by-category")
            .to_request(),
    )
    .await;
    assert_eq!(counts, json!({"ceremony": 2, "party": 1}));
}

#[rstest]
#[actix_web::test]
async fn blank_tag_filter_lists_everything(fixture: FixtureHttp) {
    let mut gallery = MockGalleryQuery::new();
    gallery
        .expect_list_photos()
        .withf(|filter, request| filter.tag.is_none() && request.page() == 1)
        .times(1)
        .returning(|_, request| Ok(Page::new(Vec::new(), request, 0)));
    let mut state = fixture.state;
    state.gallery = Arc::new(gallery);
    let app = actix_test::init_service(test_app(state)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/photos?tag=%20")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
