// Database models (internal, may differ from public DTOs)

use chrono::NaiveDate;
use roster_core::{NewParticipant, Participant};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct ParticipantRow {
    pub id: i64,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct CreateParticipantRow {
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub email: String,
    pub phone: String,
}

impl From<NewParticipant> for CreateParticipantRow {
    fn from(participant: NewParticipant) -> Self {
        Self {
            full_name: participant.full_name,
            birth_date: participant.birth_date,
            sex: participant.sex,
            email: participant.email,
            phone: participant.phone,
        }
    }
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            birth_date: row.birth_date,
            sex: row.sex,
            email: row.email,
            phone: row.phone,
        }
    }
}
