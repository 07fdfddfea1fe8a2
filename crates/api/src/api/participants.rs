// Participant HTTP routes: spreadsheet upload, listing, birth date update, bulk delete
// Decision: Every route answers both with and without the trailing slash

use crate::services::ParticipantService;
use crate::storage::StorageBackend;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use roster_core::{is_xlsx_filename, Participant};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::common::{ApiError, ApiResult, ErrorResponse, MessageResponse};

/// Name of the multipart field carrying the workbook.
pub const UPLOAD_FIELD: &str = "file";

/// Multipart form accepted by the upload endpoint
#[allow(dead_code)]
#[derive(Debug, ToSchema)]
pub struct UploadSpreadsheetForm {
    /// `.xlsx` workbook whose first sheet has the columns
    /// "Full name", "Birth date", "Sex", "E-mail" and optionally "Phone".
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Query parameters for listing participants
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParticipantsQuery {
    /// Exact match on the participant's sex. Also accepted as `sex`.
    #[serde(default, alias = "sex")]
    #[param(example = "F")]
    pub sexo: Option<String>,
}

/// Request to change a participant's birth date
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateBirthDateRequest {
    /// New birth date, preferably `YYYY-MM-DD`. Also accepted as `new_date`.
    #[serde(alias = "new_date")]
    #[schema(example = "1990-04-12")]
    pub nova_data: String,
}

/// App state for participant routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ParticipantService>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: Arc<StorageBackend>, max_upload_bytes: usize) -> Self {
        Self {
            service: Arc::new(ParticipantService::new(db)),
            max_upload_bytes,
        }
    }
}

/// Create participant routes
pub fn routes(state: AppState) -> Router {
    let upload = post(upload_spreadsheet).layer(DefaultBodyLimit::max(state.max_upload_bytes));

    Router::new()
        .route("/upload-excel/", upload.clone())
        .route("/upload-excel", upload)
        .route(
            "/participantes/",
            get(list_participants).delete(delete_participants),
        )
        .route(
            "/participantes",
            get(list_participants).delete(delete_participants),
        )
        .route("/participantes/:id", put(update_birth_date))
        .with_state(state)
}

/// POST /upload-excel/ - Import participants from an .xlsx workbook
#[utoipa::path(
    post,
    path = "/upload-excel/",
    request_body(content = UploadSpreadsheetForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Rows inserted, or `{error}` when the file is not .xlsx", body = MessageResponse),
        (status = 422, description = "Missing file field or malformed spreadsheet", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn upload_spreadsheet(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<MessageResponse> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| ApiError::unprocessable(format!("missing '{}' field", UPLOAD_FIELD)))?;

    if !is_xlsx_filename(&file_name) {
        tracing::debug!(file_name = %file_name, "Rejected upload with wrong extension");
        return Err(ApiError::logical("please send a .xlsx file"));
    }

    state.service.import_spreadsheet(bytes.to_vec()).await?;

    Ok(Json(MessageResponse::new("data inserted successfully")))
}

/// GET /participantes/ - List participants, optionally filtered by sex
#[utoipa::path(
    get,
    path = "/participantes/",
    params(ListParticipantsQuery),
    responses(
        (status = 200, description = "Participants ordered by id", body = Vec<Participant>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Query(query): Query<ListParticipantsQuery>,
) -> ApiResult<Vec<Participant>> {
    let participants = state.service.list(query.sexo.as_deref()).await?;
    Ok(Json(participants))
}

/// PUT /participantes/{id} - Update a participant's birth date
#[utoipa::path(
    put,
    path = "/participantes/{id}",
    params(
        ("id" = i64, Path, description = "Participant ID")
    ),
    request_body = UpdateBirthDateRequest,
    responses(
        (status = 200, description = "Birth date updated, or `{error}` for unknown id or bad date", body = MessageResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn update_birth_date(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBirthDateRequest>,
) -> ApiResult<MessageResponse> {
    let participant = state.service.update_birth_date(id, &req.nova_data).await?;

    Ok(Json(MessageResponse::new(format!(
        "birth date of {} updated successfully",
        participant.full_name
    ))))
}

/// DELETE /participantes/ - Delete every participant
#[utoipa::path(
    delete,
    path = "/participantes/",
    responses(
        (status = 200, description = "Number of participants removed", body = MessageResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn delete_participants(State(state): State<AppState>) -> ApiResult<MessageResponse> {
    let deleted = state.service.delete_all().await?;
    Ok(Json(MessageResponse::new(format!(
        "{} participant(s) deleted",
        deleted
    ))))
}
