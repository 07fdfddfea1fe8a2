// OpenAPI specification generation
//
// This module defines the OpenAPI spec for the Roster API.
// It can be used by both the main API server (for Swagger UI)
// and the export-openapi binary (for static spec generation).

use crate::api;
use roster_core::Participant;
use utoipa::OpenApi;

/// OpenAPI documentation for the Roster API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::participants::upload_spreadsheet,
        api::participants::list_participants,
        api::participants::update_birth_date,
        api::participants::delete_participants,
        api::webhook::calculate_age,
    ),
    components(
        schemas(
            Participant,
            api::participants::UploadSpreadsheetForm,
            api::participants::UpdateBirthDateRequest,
            api::webhook::AgeRequest,
            api::webhook::AgeResponse,
            api::ErrorResponse,
            api::MessageResponse,
        )
    ),
    tags(
        (name = "participants", description = "Participant import, listing and maintenance"),
        (name = "webhook", description = "Stateless age calculation")
    ),
    info(
        title = "Roster API",
        description = "API for registering participants from spreadsheets",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}
