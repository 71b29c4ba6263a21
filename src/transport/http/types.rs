use crate::domain::ListingQuery;
use crate::infra::AppConfig;
use crate::storage::{GuestbookStore, RestaurantStore};
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt::Display;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub restaurants: Arc<RestaurantStore>,
    pub guestbook: Arc<GuestbookStore>,
}

impl AppState {
    pub fn new(restaurants: RestaurantStore, guestbook: GuestbookStore) -> Self {
        Self {
            restaurants: Arc::new(restaurants),
            guestbook: Arc::new(guestbook),
        }
    }

    /// File-backed stores under the configured data directory.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            RestaurantStore::file(config.restaurants_path()),
            GuestbookStore::file(config.guestbook_path()),
        )
    }

    pub fn in_memory() -> Self {
        Self::new(RestaurantStore::memory(), GuestbookStore::memory())
    }

    /// First-run bootstrap: writes `[]` for any document that does not exist.
    pub async fn ensure_documents(&self) -> anyhow::Result<()> {
        self.restaurants.documents().ensure_exists().await?;
        self.guestbook.documents().ensure_exists().await?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Listing filters from the query string. `q` is accepted for `keyword`.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// Case-insensitive match on name, city or district.
    #[serde(default, alias = "q")]
    pub keyword: Option<String>,
    /// One of 北, 中, 南, 東, 離島. Unknown values are ignored.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl From<ListingParams> for ListingQuery {
    fn from(p: ListingParams) -> Self {
        ListingQuery {
            keyword: p.keyword,
            region: p.region,
            city: p.city,
        }
    }
}

/// Documented shape of a submission. Any extra keys are stored as given.
#[derive(Deserialize, Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmissionRequest {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CommentByIdRequest {
    /// Restaurant id; a JSON number is accepted as well.
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,
    pub text: String,
}

fn id_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

pub fn json_422(err: impl Display, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::failure(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}

/// Body of a write request as one object of fields. HTML forms post
/// `application/x-www-form-urlencoded`; everything else is read as JSON.
pub async fn read_fields(
    request: Request,
    expected: &str,
) -> Result<Map<String, JsonValue>, Response> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        match Form::<Vec<(String, String)>>::from_request(request, &()).await {
            Ok(Form(pairs)) => Ok(pairs
                .into_iter()
                .map(|(k, v)| (k, JsonValue::String(v)))
                .collect()),
            Err(e) => Err(json_422(e, expected).into_response()),
        }
    } else {
        match Json::<Map<String, JsonValue>>::from_request(request, &()).await {
            Ok(Json(fields)) => Ok(fields),
            Err(e) => Err(json_422(e, expected).into_response()),
        }
    }
}

/// [`read_fields`] followed by a typed view of the result.
pub async fn read_body<T: serde::de::DeserializeOwned>(
    request: Request,
    expected: &str,
) -> Result<T, Response> {
    let fields = read_fields(request, expected).await?;
    serde_json::from_value(JsonValue::Object(fields))
        .map_err(|e| json_422(e, expected).into_response())
}
