use crate::domain::Listing;
use crate::error::BoardError;
use crate::transport::http::handlers::common::{not_found, ok_json};
use crate::transport::http::types::{
    read_body, read_fields, ApiResponse, AppState, CommentByIdRequest, CommentRequest,
    ListingParams, SubmissionRequest,
};
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub const SUBMITTED_MESSAGE: &str = "投稿成功！";

#[utoipa::path(
    get,
    path = "/api/restaurants",
    params(ListingParams),
    responses(
        (status = 200, description = "Filtered listing plus the cities of the whole store", body = ApiResponse)
    )
)]
pub async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> impl IntoResponse {
    let all = state.restaurants.load().await;
    ok_json(&Listing::build(&all, params.into()))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    params(
        ("id" = String, Path, description = "Restaurant id")
    ),
    responses(
        (status = 200, description = "Restaurant found", body = ApiResponse),
        (status = 404, description = "No restaurant with this id", body = ApiResponse)
    )
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.restaurants.find(&id).await {
        Some(r) => ok_json(&r),
        None => not_found(id),
    }
}

#[utoipa::path(
    post,
    path = "/api/restaurants",
    request_body = SubmissionRequest,
    responses(
        (status = 200, description = "Restaurant submitted", body = ApiResponse),
        (status = 400, description = "Missing name/address, or already submitted", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (body is neither a JSON object nor a form)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_handler(State(state): State<AppState>, request: Request) -> Response {
    let candidate = match read_fields(request, "name, address and any other fields").await {
        Ok(fields) => fields,
        Err(rejected) => return rejected,
    };

    match state.restaurants.insert(candidate).await {
        Ok(created) => match serde_json::to_value(&created) {
            Ok(data) => (
                StatusCode::OK,
                Json(ApiResponse::ok(data).with_message(SUBMITTED_MESSAGE)),
            )
                .into_response(),
            Err(e) => BoardError::Storage(e.into()).into_response(),
        },
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/restaurants/{id}/comments",
    params(
        ("id" = String, Path, description = "Restaurant id")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment appended", body = ApiResponse),
        (status = 400, description = "Empty comment", body = ApiResponse),
        (status = 404, description = "No restaurant with this id", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (unreadable JSON or form body)", body = ApiResponse)
    )
)]
pub async fn add_comment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Response {
    match read_body::<CommentRequest>(request, "text").await {
        Ok(body) => append(&state, &id, &body.text).await,
        Err(rejected) => rejected,
    }
}

#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CommentByIdRequest,
    responses(
        (status = 200, description = "Comment appended", body = ApiResponse),
        (status = 400, description = "Empty comment", body = ApiResponse),
        (status = 404, description = "No restaurant with this id", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (unreadable JSON or form body)", body = ApiResponse)
    )
)]
pub async fn add_comment_by_body_handler(
    State(state): State<AppState>,
    request: Request,
) -> Response {
    match read_body::<CommentByIdRequest>(request, "id and text").await {
        Ok(body) => append(&state, &body.id, &body.text).await,
        Err(rejected) => rejected,
    }
}

async fn append(state: &AppState, id: &str, text: &str) -> Response {
    match state.restaurants.append_comment(id, text).await {
        Ok(comment) => ok_json(&comment),
        Err(e) => e.into_response(),
    }
}
