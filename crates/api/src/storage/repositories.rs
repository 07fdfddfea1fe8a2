// Repository layer for database operations
//
// Every operation acquires its own pooled connection (or transaction) and
// releases it when the future completes, whether it succeeded or not.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::models::*;

/// Idempotent schema bootstrap, run once at startup.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS participants (
    id         BIGSERIAL PRIMARY KEY,
    full_name  TEXT NOT NULL,
    birth_date DATE NOT NULL,
    sex        TEXT NOT NULL,
    email      TEXT NOT NULL,
    phone      TEXT NOT NULL DEFAULT ''
)
"#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Create the participants table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    // ============================================
    // Participants
    // ============================================

    /// Insert all rows in a single transaction.
    /// An error on any row drops the transaction, which rolls it back.
    pub async fn create_participants(
        &self,
        inputs: Vec<CreateParticipantRow>,
    ) -> Result<Vec<ParticipantRow>> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(inputs.len());

        for input in inputs {
            let row = sqlx::query_as::<_, ParticipantRow>(
                r#"
                INSERT INTO participants (full_name, birth_date, sex, email, phone)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, full_name, birth_date, sex, email, phone
                "#,
            )
            .bind(&input.full_name)
            .bind(input.birth_date)
            .bind(&input.sex)
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    pub async fn list_participants(&self, sex: Option<&str>) -> Result<Vec<ParticipantRow>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT id, full_name, birth_date, sex, email, phone
            FROM participants
            WHERE $1::text IS NULL OR sex = $1
            ORDER BY id
            "#,
        )
        .bind(sex)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    pub async fn get_participant(&self, id: i64) -> Result<Option<ParticipantRow>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT id, full_name, birth_date, sex, email, phone
            FROM participants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    pub async fn update_participant_birth_date(
        &self,
        id: i64,
        birth_date: NaiveDate,
    ) -> Result<Option<ParticipantRow>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, ParticipantRow>(
            r#"
            UPDATE participants
            SET birth_date = $2
            WHERE id = $1
            RETURNING id, full_name, birth_date, sex, email, phone
            "#,
        )
        .bind(id)
        .bind(birth_date)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    pub async fn delete_all_participants(&self) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM participants")
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}
