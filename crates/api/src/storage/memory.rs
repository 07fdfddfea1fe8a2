// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: Ids come from a counter that is never reset, matching BIGSERIAL
//
// This implementation mirrors the PostgreSQL repository API backed by a
// BTreeMap, allowing the server to run without a database for development.

use anyhow::Result;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::models::*;

#[derive(Default)]
struct ParticipantTable {
    rows: BTreeMap<i64, ParticipantRow>,
    last_id: i64,
}

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    participants: RwLock<ParticipantTable>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================
    // Participants
    // ============================================

    /// Insert all rows under one write lock, so readers never observe a partial batch.
    pub async fn create_participants(
        &self,
        inputs: Vec<CreateParticipantRow>,
    ) -> Result<Vec<ParticipantRow>> {
        let mut table = self.participants.write();
        let mut rows = Vec::with_capacity(inputs.len());

        for input in inputs {
            table.last_id += 1;
            let row = ParticipantRow {
                id: table.last_id,
                full_name: input.full_name,
                birth_date: input.birth_date,
                sex: input.sex,
                email: input.email,
                phone: input.phone,
            };
            table.rows.insert(row.id, row.clone());
            rows.push(row);
        }

        Ok(rows)
    }

    pub async fn list_participants(&self, sex: Option<&str>) -> Result<Vec<ParticipantRow>> {
        Ok(self
            .participants
            .read()
            .rows
            .values()
            .filter(|row| sex.map_or(true, |sex| row.sex == sex))
            .cloned()
            .collect())
    }

    pub async fn get_participant(&self, id: i64) -> Result<Option<ParticipantRow>> {
        Ok(self.participants.read().rows.get(&id).cloned())
    }

    pub async fn update_participant_birth_date(
        &self,
        id: i64,
        birth_date: NaiveDate,
    ) -> Result<Option<ParticipantRow>> {
        let mut table = self.participants.write();
        Ok(table.rows.get_mut(&id).map(|row| {
            row.birth_date = birth_date;
            row.clone()
        }))
    }

    pub async fn delete_all_participants(&self) -> Result<u64> {
        let mut table = self.participants.write();
        let deleted = table.rows.len() as u64;
        table.rows.clear();
        Ok(deleted)
    }
}
