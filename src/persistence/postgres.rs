//! PostgreSQL implementation of the challenge store.
//!
//! Uses `sqlx::PgPool` with runtime-bound queries. The one-challenge-
//! per-owner invariant lives in the schema as a `UNIQUE` constraint on
//! `challenges.owner`; obligation cleanup rides on `ON DELETE CASCADE`.
//! See `migrations/` for the schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::ChallengeStore;
use super::models::{ChallengeRow, DepositRow};
use crate::config::LedgerConfig;
use crate::domain::{Challenge, ChallengeId, DepositId, DepositObligation, DepositStatus, OwnerId};
use crate::error::LedgerError;

/// PostgreSQL-backed challenge store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to PostgreSQL using the pool settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] when the connection
    /// cannot be established.
    pub async fn connect(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] when a migration
    /// fails to apply.
    pub async fn run_migrations(&self) -> Result<(), LedgerError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))
    }
}

/// Maps a challenge-insert failure, surfacing the owner-uniqueness
/// violation as [`LedgerError::DuplicateChallenge`].
fn map_challenge_insert_error(err: sqlx::Error, owner: OwnerId) -> LedgerError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            LedgerError::DuplicateChallenge(Uuid::from(owner))
        }
        _ => LedgerError::PersistenceError(err.to_string()),
    }
}

#[async_trait]
impl ChallengeStore for PostgresStore {
    async fn insert_challenge(
        &self,
        challenge: &Challenge,
        deposits: &[DepositObligation],
    ) -> Result<(), LedgerError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        sqlx::query("INSERT INTO challenges (id, owner, target, created_at) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::from(challenge.id))
            .bind(Uuid::from(challenge.owner))
            .bind(challenge.target)
            .bind(challenge.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_challenge_insert_error(e, challenge.owner))?;

        // Inserted in plan order so sequence_order stays recoverable by
        // the ordered read even if physical row order differs.
        for deposit in deposits {
            sqlx::query(
                "INSERT INTO deposits (id, challenge_id, value, sequence_order, status, completed_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(Uuid::from(deposit.id))
            .bind(Uuid::from(deposit.challenge_id))
            .bind(deposit.value)
            .bind(deposit.sequence_order)
            .bind(deposit.status.as_str())
            .bind(deposit.completed_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))
    }

    async fn challenge_for_owner(&self, owner: OwnerId) -> Result<Option<Challenge>, LedgerError> {
        let row = sqlx::query_as::<_, ChallengeRow>(
            "SELECT id, owner, target, created_at FROM challenges WHERE owner = $1",
        )
        .bind(Uuid::from(owner))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        Ok(row.map(Challenge::from))
    }

    async fn deposits_for_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<DepositObligation>, LedgerError> {
        let rows = sqlx::query_as::<_, DepositRow>(
            "SELECT id, challenge_id, value, sequence_order, status, completed_at \
             FROM deposits WHERE challenge_id = $1 ORDER BY sequence_order ASC",
        )
        .bind(Uuid::from(challenge_id))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(DepositObligation::try_from).collect()
    }

    async fn deposit_by_id(&self, deposit_id: DepositId) -> Result<DepositObligation, LedgerError> {
        let row = sqlx::query_as::<_, DepositRow>(
            "SELECT id, challenge_id, value, sequence_order, status, completed_at \
             FROM deposits WHERE id = $1",
        )
        .bind(Uuid::from(deposit_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        row.map_or(
            Err(LedgerError::DepositNotFound(Uuid::from(deposit_id))),
            DepositObligation::try_from,
        )
    }

    async fn update_deposit(
        &self,
        deposit_id: DepositId,
        status: DepositStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query("UPDATE deposits SET status = $2, completed_at = $3 WHERE id = $1")
            .bind(Uuid::from(deposit_id))
            .bind(status.as_str())
            .bind(completed_at)
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::DepositNotFound(Uuid::from(deposit_id)));
        }
        Ok(())
    }

    async fn delete_challenge(&self, owner: OwnerId) -> Result<ChallengeId, LedgerError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM challenges WHERE owner = $1 RETURNING id",
        )
        .bind(Uuid::from(owner))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        id.map(ChallengeId::from_uuid)
            .ok_or(LedgerError::ChallengeNotFound(Uuid::from(owner)))
    }
}
