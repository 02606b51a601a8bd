//! End-to-end scenarios against the assembled router (in-memory store)

use std::sync::Arc;

use autoplaza::config::AppConfig;
use autoplaza::gateway::{create_router, state::AppState, types::error_codes};
use autoplaza::store::MemoryStore;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    _images: TempDir,
}

async fn spawn_app() -> TestApp {
    let images = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-secret".to_string();
    config.images.upload_dir = images.path().to_string_lossy().into_owned();

    let state = AppState::build(
        &config,
        Arc::new(MemoryStore::new()),
        Arc::new(mockable::DefaultClock),
    )
    .await
    .unwrap();

    TestApp {
        router: create_router(Arc::new(state)),
        _images: images,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Register a seller and log them in, returning the bearer token
    async fn seller_token(&self, national_id: &str, email: &str) -> String {
        let (status, _) = self
            .call(
                "POST",
                "/api/v1/users",
                None,
                Some(json!({
                    "nationalId": national_id,
                    "name": "Ana",
                    "email": email,
                    "phone": "600000000",
                    "password": "s3cret"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .call(
                "POST",
                "/api/v1/login",
                None,
                Some(json!({ "email": email, "password": "s3cret" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }
}

fn vehicle(plate: &str) -> Value {
    json!({
        "plate": plate,
        "brand": "Seat",
        "model": "Ibiza",
        "year": 2018,
        "mileage": 45000,
        "price": 9500.0,
        "city": "Valencia",
        "province": "Valencia",
        "fuelType": "Gasolina",
        "transmission": "Manual",
        "horsepower": 95,
        "images": []
    })
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;
    let (status, body) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], error_codes::SUCCESS);
    assert!(body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_search_without_params_and_bad_bound() {
    let app = spawn_app().await;
    let token = app.seller_token("12345678A", "ana@example.com").await;
    app.call("POST", "/api/v1/vehicles", Some(&token), Some(vehicle("1234ABC")))
        .await;

    let (status, body) = app.call("GET", "/api/v1/vehicles", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .call("GET", "/api/v1/vehicles?fuel=Diesel&brand=all", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = app
        .call("GET", "/api/v1/vehicles?year-from=abc", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], error_codes::INVALID_FILTER_VALUE);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = spawn_app().await;
    let (status, body) = app
        .call("POST", "/api/v1/vehicles", None, Some(vehicle("1234ABC")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], error_codes::MISSING_AUTH);

    let (status, body) = app
        .call("POST", "/api/v1/vehicles", Some("garbage"), Some(vehicle("1234ABC")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], error_codes::AUTH_FAILED);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = spawn_app().await;
    app.seller_token("12345678A", "ana@example.com").await;
    let (status, body) = app
        .call(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": "ana@example.com", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], error_codes::INVALID_CREDENTIALS);
}

#[tokio::test]
async fn test_vehicle_lifecycle() {
    let app = spawn_app().await;
    let token = app.seller_token("12345678A", "ana@example.com").await;

    let (status, body) = app
        .call("POST", "/api/v1/vehicles", Some(&token), Some(vehicle("1234ABC")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["fuelType"], "Gasoline");

    let (status, body) = app
        .call("POST", "/api/v1/vehicles", Some(&token), Some(vehicle("1234ABC")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], error_codes::DUPLICATE_KEY);

    let mut too_old = vehicle("9999ZZZ");
    too_old["year"] = json!(1950);
    let (status, _) = app
        .call("POST", "/api/v1/vehicles", Some(&token), Some(too_old))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut textual_year = vehicle("9999ZZZ");
    textual_year["year"] = json!("old");
    let (status, body) = app
        .call("POST", "/api/v1/vehicles", Some(&token), Some(textual_year))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], error_codes::INVALID_PARAMETER);
    assert!(body["msg"].as_str().unwrap().contains("year"));

    let mut quoted_numbers = vehicle("5555BBB");
    quoted_numbers["year"] = json!("2019");
    quoted_numbers["price"] = json!("12000");
    let (status, body) = app
        .call("POST", "/api/v1/vehicles", Some(&token), Some(quoted_numbers))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["year"], 2019);

    let (status, _) = app
        .call(
            "PUT",
            "/api/v1/vehicles/1234ABC",
            Some(&token),
            Some(json!({ "price": 8900.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            "PUT",
            "/api/v1/vehicles/1234ABC",
            Some(&token),
            Some(json!({ "price": 8900.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], error_codes::NO_CHANGE_APPLIED);

    let (status, body) = app.call("GET", "/api/v1/vehicles/1234ABC", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 8900.0);

    let (status, _) = app
        .call("DELETE", "/api/v1/vehicles/1234ABC", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.call("GET", "/api/v1/vehicles/1234ABC", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], error_codes::NOT_FOUND);
}

#[tokio::test]
async fn test_user_views() {
    let app = spawn_app().await;
    let token = app.seller_token("12345678A", "ana@example.com").await;

    let (status, body) = app.call("GET", "/api/v1/users/12345678A", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ana@example.com");
    assert!(body["data"].get("nationalId").is_none());

    let (status, body) = app
        .call("GET", "/api/v1/profile/12345678A", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nationalId"], "12345678A");
    assert!(body["data"].get("passwordHash").is_none());

    let (status, _) = app
        .call(
            "POST",
            "/api/v1/users",
            None,
            Some(json!({ "nationalId": "X1", "name": "Bad", "email": "not-an-email", "password": "p" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publication_references() {
    let app = spawn_app().await;
    let token = app.seller_token("12345678A", "ana@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/publications",
            Some(&token),
            Some(json!({ "plate": "0000XXX", "nationalId": "12345678A" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], error_codes::DANGLING_VEHICLE_REFERENCE);

    let (status, body) = app.call("GET", "/api/v1/publications", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], error_codes::NOT_FOUND);

    app.call("POST", "/api/v1/vehicles", Some(&token), Some(vehicle("1234ABC")))
        .await;
    let publication = json!({
        "plate": "1234ABC",
        "nationalId": "12345678A",
        "date": "2024-05-01T10:00:00"
    });
    let (status, body) = app
        .call("POST", "/api/v1/publications", Some(&token), Some(publication.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call("POST", "/api/v1/publications", Some(&token), Some(publication))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], error_codes::DUPLICATE_PUBLICATION);

    let (status, body) = app
        .call("GET", &format!("/api/v1/publications/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plate"], "1234ABC");

    let (status, _) = app
        .call("GET", "/api/v1/publications/not-an-id", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call("DELETE", &format!("/api/v1/publications/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_favorites() {
    let app = spawn_app().await;
    let token = app.seller_token("12345678A", "ana@example.com").await;
    app.call("POST", "/api/v1/vehicles", Some(&token), Some(vehicle("1234ABC")))
        .await;
    let pair = json!({ "nationalId": "12345678A", "plate": "1234ABC" });

    let (status, _) = app
        .call("POST", "/api/v1/favorites", Some(&token), Some(pair.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app
        .call("POST", "/api/v1/favorites", Some(&token), Some(pair.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], error_codes::DUPLICATE_FAVORITE);

    let (status, body) = app
        .call("GET", "/api/v1/favorites/12345678A", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["plate"], "1234ABC");

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/favorites",
            Some(&token),
            Some(json!({ "nationalId": "12345678A" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], error_codes::MISSING_IDENTIFIERS);

    let (status, _) = app
        .call("DELETE", "/api/v1/favorites", Some(&token), Some(pair.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .call("DELETE", "/api/v1/favorites", Some(&token), Some(pair))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = spawn_app().await;
    let token = app.seller_token("12345678A", "ana@example.com").await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/vehicles")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"plate\": "))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], error_codes::INVALID_PARAMETER);
}

#[tokio::test]
async fn test_image_upload_then_partial_delete() {
    let app = spawn_app().await;
    let token = app.seller_token("12345678A", "ana@example.com").await;

    let boundary = "autoplaza-boundary";
    let multipart = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"front.png\"\r\n\
         Content-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/images")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    let stored = body["data"]["images"][0].as_str().unwrap().to_string();
    assert!(stored.ends_with("front.png"));

    let (status, body) = app
        .call(
            "POST",
            "/api/v1/images/delete",
            Some(&token),
            Some(json!({ "images": [stored, "missing.png"] })),
        )
        .await;
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["code"], error_codes::PARTIAL_SUCCESS);
    assert_eq!(body["data"]["results"][0]["status"], "deleted");
    assert_eq!(body["data"]["results"][1]["status"], "not_found");

    let (status, _) = app
        .call(
            "POST",
            "/api/v1/images/delete",
            Some(&token),
            Some(json!({ "images": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
