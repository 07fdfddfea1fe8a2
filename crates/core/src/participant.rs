// Participant domain types
//
// These types represent the Participant entity independent of storage.
// Used by the spreadsheet importer, the storage layer and the API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Participant - a single person's registration data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Participant {
    /// Unique identifier, assigned by the store on creation.
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i64,
    /// Full name as written in the source spreadsheet.
    #[cfg_attr(feature = "openapi", schema(example = "Maria Souza"))]
    pub full_name: String,
    /// Birth date, serialized as `YYYY-MM-DD`.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date, example = "1990-04-12"))]
    pub birth_date: NaiveDate,
    /// Free-form sex marker (e.g. "M", "F").
    #[cfg_attr(feature = "openapi", schema(example = "F"))]
    pub sex: String,
    /// Contact e-mail. Not validated.
    #[cfg_attr(feature = "openapi", schema(example = "maria@example.com"))]
    pub email: String,
    /// Phone number, empty when unknown.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "11987654321"))]
    pub phone: String,
}

/// A participant that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub email: String,
    pub phone: String,
}

impl NewParticipant {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i64) -> Participant {
        Participant {
            id,
            full_name: self.full_name,
            birth_date: self.birth_date,
            sex: self.sex,
            email: self.email,
            phone: self.phone,
        }
    }
}
