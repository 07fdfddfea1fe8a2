// Participant service: spreadsheet import, listing, birth date updates, bulk delete

use crate::storage::{CreateParticipantRow, StorageBackend};
use anyhow::Context;
use roster_core::{parse_date, read_participants, Participant};
use std::sync::Arc;

use super::{ServiceError, ServiceResult};

pub struct ParticipantService {
    db: Arc<StorageBackend>,
}

impl ParticipantService {
    pub fn new(db: Arc<StorageBackend>) -> Self {
        Self { db }
    }

    /// Decode every row of an `.xlsx` workbook and insert them as one batch.
    ///
    /// Nothing is stored unless the whole sheet decodes.
    pub async fn import_spreadsheet(&self, bytes: Vec<u8>) -> ServiceResult<usize> {
        let size = bytes.len();
        let participants = tokio::task::spawn_blocking(move || read_participants(&bytes))
            .await
            .context("spreadsheet decoding task failed")??;

        let inputs: Vec<CreateParticipantRow> =
            participants.into_iter().map(CreateParticipantRow::from).collect();
        let rows = self.db.create_participants(inputs).await?;

        tracing::info!(bytes = size, inserted = rows.len(), "Imported participants");
        Ok(rows.len())
    }

    /// List participants in id order, optionally restricted to one `sex` value.
    pub async fn list(&self, sex: Option<&str>) -> ServiceResult<Vec<Participant>> {
        let sex = sex.filter(|value| !value.is_empty());
        let rows = self.db.list_participants(sex).await?;
        Ok(rows.into_iter().map(Participant::from).collect())
    }

    pub async fn update_birth_date(&self, id: i64, new_date: &str) -> ServiceResult<Participant> {
        // Unknown ids are reported before the date is looked at
        if self.db.get_participant(id).await?.is_none() {
            return Err(ServiceError::NotFound);
        }

        let birth_date = parse_date(new_date)?;
        let row = self
            .db
            .update_participant_birth_date(id, birth_date)
            .await?
            .ok_or(ServiceError::NotFound)?;

        tracing::info!(participant_id = id, %birth_date, "Updated birth date");
        Ok(row.into())
    }

    pub async fn delete_all(&self) -> ServiceResult<u64> {
        let deleted = self.db.delete_all_participants().await?;
        tracing::info!(deleted, "Deleted all participants");
        Ok(deleted)
    }
}
