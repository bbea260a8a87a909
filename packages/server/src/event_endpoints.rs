//! Event REST endpoints
//!
//! - `GET /api/events` - list all events, newest first
//! - `GET /api/events/:slug` - fetch one event by its URL slug
//! - `POST /api/events` - create an event from multipart form data

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use evently_core::{Event, EventServiceError};
use serde::Serialize;
use std::collections::HashMap;

use crate::api_error::ApiError;
use crate::AppState;

/// Event routes with shared state baked in
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/:slug", get(get_event_by_slug))
        .with_state(state)
}

#[derive(Serialize)]
struct EventListResponse {
    message: String,
    events: Vec<Event>,
}

#[derive(Serialize)]
struct EventDetailResponse {
    success: bool,
    event: Event,
}

#[derive(Serialize)]
struct EventCreatedResponse {
    message: String,
    event: Event,
}

/// GET /api/events
async fn list_events(State(state): State<AppState>) -> Response {
    match state.events.list_events().await {
        Ok(events) => (
            StatusCode::OK,
            Json(EventListResponse {
                message: "Events fetched successfully".to_string(),
                events,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to list events: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch events")
                .with_detail(e.to_string())
                .into_response()
        }
    }
}

/// GET /api/events/:slug
async fn get_event_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    match state.events.get_event_by_slug(&slug).await {
        Ok(event) => (
            StatusCode::OK,
            Json(EventDetailResponse {
                success: true,
                event,
            }),
        )
            .into_response(),
        Err(e @ EventServiceError::ValidationFailed(_)) => {
            ApiError::new(StatusCode::BAD_REQUEST, e.to_string())
                .with_success_flag()
                .into_response()
        }
        Err(e @ EventServiceError::EventNotFound { .. }) => {
            ApiError::new(StatusCode::NOT_FOUND, e.to_string())
                .with_success_flag()
                .into_response()
        }
        Err(e) => {
            tracing::error!(%slug, "Failed to fetch event: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch event")
                .with_success_flag()
                .with_detail(e.to_string())
                .into_response()
        }
    }
}

fn creation_failed(detail: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Event creation failed 😣")
        .with_detail(detail)
}

/// POST /api/events
///
/// Multipart form data. Text parts become candidate event fields; a binary
/// part named `image` is uploaded to the configured media host and its
/// hosted URL takes the field's place.
async fn create_event(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut image: Option<(String, axum::body::Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return creation_failed(e.to_string()).into_response(),
        };

        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        if name == "image" && field.file_name().is_some() {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            match field.bytes().await {
                Ok(bytes) => image = Some((file_name, bytes)),
                Err(e) => return creation_failed(e.to_string()).into_response(),
            }
        } else {
            match field.text().await {
                Ok(value) => {
                    fields.insert(name, value);
                }
                Err(e) => return creation_failed(e.to_string()).into_response(),
            }
        }
    }

    if let Some((file_name, bytes)) = image {
        let Some(media) = &state.media else {
            tracing::error!("Image posted but no media host is configured");
            return creation_failed("image uploads are not configured").into_response();
        };
        match media.upload_image(&file_name, bytes).await {
            Ok(url) => {
                fields.insert("image".to_string(), url);
            }
            Err(e) => {
                tracing::error!("Image upload failed: {}", e);
                return creation_failed(e.to_string()).into_response();
            }
        }
    }

    match state.events.create_event(&fields).await {
        Ok(event) => (
            StatusCode::CREATED,
            Json(EventCreatedResponse {
                message: "Event created successfully! 🎉".to_string(),
                event,
            }),
        )
            .into_response(),
        Err(EventServiceError::ValidationFailed(_)) => {
            ApiError::new(StatusCode::BAD_REQUEST, "Title and description are required")
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create event: {}", e);
            creation_failed(e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use evently_core::{BookingService, ConnectionCache, EventService};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(temp_dir: &TempDir) -> AppState {
        let cache = Arc::new(ConnectionCache::new(temp_dir.path().join("test.db")));
        AppState {
            events: Arc::new(EventService::new(cache.clone())),
            bookings: Arc::new(BookingService::new(cache)),
            media: None,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    fn multipart_body(fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        body
    }

    fn multipart_request(fields: &[(&str, &str)]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/events")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_event_returns_201_with_payload() {
        let temp_dir = TempDir::new().unwrap();
        let app = routes(test_state(&temp_dir));

        let response = app
            .oneshot(multipart_request(&[
                ("title", "Launch"),
                ("description", "Kickoff"),
                ("tags", "rust, web"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Event created successfully! 🎉");
        assert_eq!(json["event"]["slug"], "launch");
        assert_eq!(json["event"]["tags"], serde_json::json!(["rust", "web"]));
    }

    #[tokio::test]
    async fn test_create_event_missing_description_is_400() {
        let temp_dir = TempDir::new().unwrap();
        let app = routes(test_state(&temp_dir));

        let response = app
            .oneshot(multipart_request(&[("title", "Launch")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Title and description are required");
    }

    #[tokio::test]
    async fn test_get_event_by_slug_not_found_is_404() {
        let temp_dir = TempDir::new().unwrap();
        let app = routes(test_state(&temp_dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events/my-talk-2026")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("my-talk-2026"));
    }

    #[tokio::test]
    async fn test_get_event_malformed_slug_is_400() {
        let temp_dir = TempDir::new().unwrap();
        let app = routes(test_state(&temp_dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events/My_Talk")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_get_event_by_slug_returns_created_event() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let app = routes(state);

        let created = app
            .clone()
            .oneshot(multipart_request(&[
                ("title", "My Talk 2026"),
                ("description", "A talk"),
            ]))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events/my-talk-2026")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["event"]["title"], "My Talk 2026");
    }

    #[tokio::test]
    async fn test_list_events_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let app = routes(test_state(&temp_dir));

        for title in ["First", "Second"] {
            let response = app
                .clone()
                .oneshot(multipart_request(&[("title", title), ("description", "d")]))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Events fetched successfully");
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["title"], "Second");
        assert_eq!(events[1]["title"], "First");
    }

    fn multipart_request_with_image(fields: &[(&str, &str)], file_name: &str) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                name, value
            ));
        }
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
            file_name
        ));
        body.push_str("Content-Type: image/png\r\n\r\nnot-a-real-png\r\n");
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        Request::builder()
            .method("POST")
            .uri("/api/events")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_image_without_media_host_is_500() {
        let temp_dir = TempDir::new().unwrap();
        let app = routes(test_state(&temp_dir));

        let response = app
            .oneshot(multipart_request_with_image(
                &[("title", "Launch"), ("description", "Kickoff")],
                "poster.png",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Event creation failed 😣");
    }

    #[tokio::test]
    async fn test_posted_image_is_replaced_with_hosted_url() {
        use crate::config::MediaConfig;
        use crate::media::MediaClient;
        use axum::routing::post;

        // Stub media host that returns a fixed hosted URL
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let stub = Router::new().route(
                "/upload",
                post(|| async {
                    Json(serde_json::json!({
                        "secure_url": "https://cdn.example.com/poster.png"
                    }))
                }),
            );
            axum::serve(listener, stub).await.unwrap();
        });

        let temp_dir = TempDir::new().unwrap();
        let mut state = test_state(&temp_dir);
        state.media = Some(Arc::new(MediaClient::new(&MediaConfig {
            upload_url: format!("http://{}/upload", addr),
            api_key: None,
        })));
        let app = routes(state);

        let response = app
            .oneshot(multipart_request_with_image(
                &[("title", "Launch"), ("description", "Kickoff")],
                "poster.png",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(
            json["event"]["image"],
            "https://cdn.example.com/poster.png"
        );
    }
}
