//! Booking REST endpoints
//!
//! - `POST /api/bookings` - book a spot on an event by id and email

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use evently_core::{Booking, CreateBookingInput};
use serde::{Deserialize, Serialize};

use crate::api_error::ApiError;
use crate::AppState;

/// Booking routes with shared state baked in
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Serialize)]
struct BookingCreatedResponse {
    message: String,
    booking: Booking,
}

/// POST /api/bookings
async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Response {
    let input = CreateBookingInput {
        event_id: request.event_id,
        email: request.email,
    };

    match state.bookings.create_booking(input).await {
        Ok(booking) => (
            StatusCode::CREATED,
            Json(BookingCreatedResponse {
                message: "Booking confirmed".to_string(),
                booking,
            }),
        )
            .into_response(),
        Err(e) => {
            let api_error = ApiError::from(e);
            if api_error.status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!("Failed to create booking: {}", api_error.message);
            }
            api_error.into_response()
        }
    }
}
