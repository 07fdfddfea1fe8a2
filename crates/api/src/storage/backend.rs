// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either PostgreSQL (production) or in-memory (dev mode) storage.

use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    /// and make sure the schema exists
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.ensure_schema().await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Short backend name for health reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self {
            Self::Postgres(db) => db.ping().await,
            Self::InMemory(_) => Ok(()),
        }
    }

    // ============================================
    // Participants
    // ============================================

    pub async fn create_participants(
        &self,
        inputs: Vec<CreateParticipantRow>,
    ) -> Result<Vec<ParticipantRow>> {
        match self {
            Self::Postgres(db) => db.create_participants(inputs).await,
            Self::InMemory(db) => db.create_participants(inputs).await,
        }
    }

    pub async fn list_participants(&self, sex: Option<&str>) -> Result<Vec<ParticipantRow>> {
        match self {
            Self::Postgres(db) => db.list_participants(sex).await,
            Self::InMemory(db) => db.list_participants(sex).await,
        }
    }

    pub async fn get_participant(&self, id: i64) -> Result<Option<ParticipantRow>> {
        match self {
            Self::Postgres(db) => db.get_participant(id).await,
            Self::InMemory(db) => db.get_participant(id).await,
        }
    }

    pub async fn update_participant_birth_date(
        &self,
        id: i64,
        birth_date: NaiveDate,
    ) -> Result<Option<ParticipantRow>> {
        match self {
            Self::Postgres(db) => db.update_participant_birth_date(id, birth_date).await,
            Self::InMemory(db) => db.update_participant_birth_date(id, birth_date).await,
        }
    }

    pub async fn delete_all_participants(&self) -> Result<u64> {
        match self {
            Self::Postgres(db) => db.delete_all_participants().await,
            Self::InMemory(db) => db.delete_all_participants().await,
        }
    }
}
