// Age webhook: computes an age from a birth date without touching storage

use crate::services::{AgeError, AgeService};
use axum::{extract::State, routing::post, Json, Router};
use roster_core::DateParseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::common::{ApiError, ApiResult, ErrorResponse};

/// Webhook payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AgeRequest {
    /// Birth date, preferably `YYYY-MM-DD`. Also accepted as `birth_date`.
    /// Kept as raw JSON so a number or boolean is reported as an invalid date.
    #[serde(default, alias = "birth_date")]
    #[schema(value_type = Option<String>, example = "2000-06-15")]
    pub data_nascimento: Option<Value>,
}

impl AgeRequest {
    /// The birth date as text; `null` counts as absent.
    fn birth_date(&self) -> Result<Option<&str>, AgeError> {
        match &self.data_nascimento {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(AgeError::InvalidBirthDate(
                DateParseError::Unrecognized(other.to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AgeResponse {
    /// Age in whole years
    #[schema(example = 24)]
    pub idade: i32,
    #[schema(example = "age calculated successfully")]
    pub status: String,
}

#[derive(Clone)]
pub struct AppState {
    pub service: AgeService,
}

impl AppState {
    pub fn new(service: AgeService) -> Self {
        Self { service }
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/webhook/", post(calculate_age))
        .route("/webhook", post(calculate_age))
        .with_state(state)
}

/// POST /webhook/ - Calculate an age from a birth date
#[utoipa::path(
    post,
    path = "/webhook/",
    request_body = AgeRequest,
    responses(
        (status = 200, description = "Age in years, or `{error}` for a missing or invalid date", body = AgeResponse),
        (status = 422, description = "Body is not a JSON object", body = ErrorResponse)
    ),
    tag = "webhook"
)]
pub async fn calculate_age(
    State(state): State<AppState>,
    Json(req): Json<AgeRequest>,
) -> ApiResult<AgeResponse> {
    let idade = req
        .birth_date()
        .and_then(|birth_date| state.service.calculate(birth_date))
        .map_err(|e| ApiError::logical(e.to_string()))?;

    Ok(Json(AgeResponse {
        idade,
        status: "age calculated successfully".to_string(),
    }))
}
