use crate::domain::Listing;
use crate::transport::http::types::{AppState, ListingParams};
use crate::transport::http::views;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};

pub async fn index_page(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Html<String> {
    let all = state.restaurants.load().await;
    Html(views::render_index(&Listing::build(&all, params.into())))
}

pub async fn post_page() -> Html<String> {
    Html(views::render_post_form())
}

/// Unknown ids go back to the listing instead of an error page.
pub async fn detail_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.restaurants.find(&id).await {
        Some(r) => Html(views::render_detail(&r)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}
