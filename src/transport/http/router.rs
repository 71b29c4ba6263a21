use crate::domain::Region;
use crate::transport::http::handlers::{guestbook, health, pages, restaurants};
use crate::transport::http::types::{
    ApiResponse, CommentByIdRequest, CommentRequest, SubmissionRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        restaurants::list_handler,
        restaurants::get_handler,
        restaurants::create_handler,
        restaurants::add_comment_handler,
        restaurants::add_comment_by_body_handler,
        guestbook::list_guestbook_handler,
        guestbook::post_guestbook_handler
    ),
    components(schemas(
        ApiResponse,
        SubmissionRequest,
        CommentRequest,
        CommentByIdRequest,
        Region
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

/// HTML pages and the JSON API. Static files, CORS and Swagger are layered on in `main`.
pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/", get(pages::index_page))
        .route("/post", get(pages::post_page))
        .route("/detail/:id", get(pages::detail_page))
        .route(
            "/api/restaurants",
            get(restaurants::list_handler).post(restaurants::create_handler),
        )
        .route("/api/restaurants/:id", get(restaurants::get_handler))
        .route(
            "/api/restaurants/:id/comments",
            post(restaurants::add_comment_handler),
        )
        .route("/api/comments", post(restaurants::add_comment_by_body_handler))
        .route(
            "/api/guestbook",
            get(guestbook::list_guestbook_handler).post(guestbook::post_guestbook_handler),
        )
        .with_state(app_state)
}
