use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (documents readable)", body = ApiResponse),
        (status = 503, description = "A document is unreadable or corrupt", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (_, restaurants) = state.restaurants.load_with_outcome().await;
    let (_, guestbook) = state.guestbook.load_with_outcome().await;

    let detail = serde_json::json!({
        "restaurants": restaurants,
        "guestbook": guestbook,
    });

    if restaurants.is_corrupt() || guestbook.is_corrupt() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                success: false,
                message: Some("A document is unreadable or corrupt".to_string()),
                data: Some(serde_json::json!({ "status": "unhealthy", "documents": detail })),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::OK,
            Json(ApiResponse::ok(
                serde_json::json!({ "status": "ok", "documents": detail }),
            )),
        )
            .into_response()
    }
}
