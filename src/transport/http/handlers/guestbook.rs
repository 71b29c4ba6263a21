use crate::error::BoardError;
use crate::transport::http::handlers::common::ok_json;
use crate::transport::http::types::{read_fields, ApiResponse, AppState};
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};

#[utoipa::path(
    get,
    path = "/api/guestbook",
    responses(
        (status = 200, description = "All guestbook entries, oldest first", body = ApiResponse)
    )
)]
pub async fn list_guestbook_handler(State(state): State<AppState>) -> impl IntoResponse {
    ok_json(&state.guestbook.list().await)
}

#[utoipa::path(
    post,
    path = "/api/guestbook",
    responses(
        (status = 200, description = "Entry stored (body: any JSON object or form; `id` and `time` are assigned)", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (body is neither a JSON object nor a form)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn post_guestbook_handler(State(state): State<AppState>, request: Request) -> Response {
    let fields = match read_fields(request, "a JSON object or form").await {
        Ok(fields) => fields,
        Err(rejected) => return rejected,
    };
    match state.guestbook.post(fields).await {
        Ok(entry) => ok_json(&entry),
        Err(e) => BoardError::Storage(e).into_response(),
    }
}
