use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_booking, decide_booking, get_booking, item_booking_summary, list_by_booker,
    list_by_owner,
};

/// Creates the API router with all booking endpoints
///
/// Command endpoints:
/// - POST /bookings - Request a booking
/// - PATCH /bookings/:id?approved=bool - Approve or reject a booking
///
/// Query endpoints:
/// - GET /bookings/:id - Booking details for its booker or item owner
/// - GET /bookings - Bookings made by the requester
/// - GET /bookings/owner - Bookings on items the requester owns
/// - GET /bookings/items/:item_id/summary - Last and next approved booking of an item
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/bookings", get(list_by_booker).post(create_booking))
        .route("/bookings/owner", get(list_by_owner))
        .route("/bookings/items/:item_id/summary", get(item_booking_summary))
        .route("/bookings/:id", get(get_booking).patch(decide_booking))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
