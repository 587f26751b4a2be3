//! [`DataStore`] and [`RecordStore`] over PostgreSQL.

use async_trait::async_trait;
use hygiene_core::error::CoreError;
use hygiene_core::inspection::{
    apply_outcome, generate_reference_number, Inspection, InspectionOutcome, NewInspection,
};
use hygiene_core::premises::{EnforcementAction, Premises};
use hygiene_core::store::{due_window_cutoff, DataStore, RecordStore};
use hygiene_core::types::{DbId, Timestamp};

use crate::repositories::{EnforcementActionRepo, InspectionRepo, PremisesRepo};
use crate::DbPool;

/// PostgreSQL foreign-key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Data store backed by a `sqlx` connection pool.
#[derive(Clone)]
pub struct PgDataStore {
    pool: DbPool,
}

impl PgDataStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx error onto the domain taxonomy.
///
/// `RowNotFound` becomes `NotFound` for the given entity; everything else is
/// treated as the store being unavailable.
pub fn map_sqlx_error(err: sqlx::Error, entity: &'static str, reference: &str) -> CoreError {
    match err {
        sqlx::Error::RowNotFound => CoreError::NotFound {
            entity,
            reference: reference.to_string(),
        },
        other => {
            tracing::error!(error = %other, entity, reference, "Database error");
            CoreError::DataStoreUnavailable(other.to_string())
        }
    }
}

fn unavailable(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::DataStoreUnavailable(err.to_string())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

#[async_trait]
impl DataStore for PgDataStore {
    async fn get_premises(&self, premises_ref: &str) -> Result<Option<Premises>, CoreError> {
        let row = PremisesRepo::find_by_ref(&self.pool, premises_ref)
            .await
            .map_err(unavailable)?;
        Ok(row.map(Premises::from))
    }

    async fn get_all_premises(&self) -> Result<Vec<Premises>, CoreError> {
        let rows = PremisesRepo::list(&self.pool).await.map_err(unavailable)?;
        Ok(rows.into_iter().map(Premises::from).collect())
    }

    async fn get_previous_actions(
        &self,
        premises_ref: &str,
    ) -> Result<Vec<EnforcementAction>, CoreError> {
        let rows = EnforcementActionRepo::list_for_premises(&self.pool, premises_ref)
            .await
            .map_err(unavailable)?;
        Ok(rows.into_iter().map(EnforcementAction::from).collect())
    }

    async fn get_inspections_for_premises(
        &self,
        premises_ref: &str,
    ) -> Result<Vec<Inspection>, CoreError> {
        InspectionRepo::list_for_premises(&self.pool, premises_ref)
            .await
            .map_err(unavailable)?
            .into_iter()
            .map(Inspection::try_from)
            .collect()
    }

    async fn get_premises_due_inspection(
        &self,
        within_months: u32,
        now: Timestamp,
    ) -> Result<Vec<Premises>, CoreError> {
        let cutoff = due_window_cutoff(within_months, now);
        let rows = PremisesRepo::list_due(&self.pool, cutoff)
            .await
            .map_err(unavailable)?;
        tracing::debug!(%cutoff, count = rows.len(), "Fetched premises due inspection");
        Ok(rows.into_iter().map(Premises::from).collect())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(unavailable)
    }
}

#[async_trait]
impl RecordStore for PgDataStore {
    async fn upsert_premises(
        &self,
        premises: Premises,
        actions: Vec<EnforcementAction>,
    ) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        PremisesRepo::upsert(&mut tx, &premises)
            .await
            .map_err(unavailable)?;
        let inserted =
            EnforcementActionRepo::replace_for_premises(&mut tx, &premises.premises_ref, &actions)
                .await
                .map_err(unavailable)?;

        tx.commit().await.map_err(unavailable)?;
        tracing::debug!(premises_ref = %premises.premises_ref, actions = inserted, "Upserted premises");
        Ok(())
    }

    async fn create_inspection(
        &self,
        input: NewInspection,
        now: Timestamp,
    ) -> Result<Inspection, CoreError> {
        let reference_number = generate_reference_number(now);
        let row = InspectionRepo::create(&self.pool, &input, &reference_number)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    CoreError::premises_not_found(&input.premises_ref)
                } else {
                    unavailable(err)
                }
            })?;
        Inspection::try_from(row)
    }

    async fn get_inspection(&self, id: DbId) -> Result<Option<Inspection>, CoreError> {
        InspectionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(unavailable)?
            .map(Inspection::try_from)
            .transpose()
    }

    async fn complete_inspection(
        &self,
        id: DbId,
        outcome: &InspectionOutcome,
        now: Timestamp,
    ) -> Result<Inspection, CoreError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        let row = InspectionRepo::find_by_id_for_update(&mut tx, id)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Inspection",
                reference: id.to_string(),
            })?;

        let mut inspection = Inspection::try_from(row)?;
        apply_outcome(&mut inspection, outcome, now)?;

        let saved = InspectionRepo::save_outcome(&mut tx, &inspection)
            .await
            .map_err(|err| map_sqlx_error(err, "Inspection", &id.to_string()))?;
        tx.commit().await.map_err(unavailable)?;

        Inspection::try_from(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound, "Inspection", "12");
        assert_matches!(
            err,
            CoreError::NotFound { entity: "Inspection", reference } if reference == "12"
        );
    }

    #[test]
    fn other_errors_map_to_unavailable() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut, "Premises", "FP/1");
        assert_matches!(err, CoreError::DataStoreUnavailable(_));
    }

    #[test]
    fn pool_errors_are_not_foreign_key_violations() {
        assert!(!is_foreign_key_violation(&sqlx::Error::PoolClosed));
    }
}
