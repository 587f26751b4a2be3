//! Repository for the `enforcement_actions` table.

use hygiene_core::premises::EnforcementAction;
use sqlx::{PgConnection, PgPool};

use crate::models::enforcement_action::EnforcementActionRow;

/// Column list for enforcement_actions queries.
const COLUMNS: &str = "id, premises_ref, action_date, action_type, detail";

pub struct EnforcementActionRepo;

impl EnforcementActionRepo {
    /// Actions for one premises, newest first with undated actions last.
    pub async fn list_for_premises(
        pool: &PgPool,
        premises_ref: &str,
    ) -> Result<Vec<EnforcementActionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enforcement_actions
             WHERE premises_ref = $1
             ORDER BY action_date DESC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, EnforcementActionRow>(&query)
            .bind(premises_ref)
            .fetch_all(pool)
            .await
    }

    /// Replace the whole history of one premises. Returns the number of
    /// actions inserted.
    pub async fn replace_for_premises(
        conn: &mut PgConnection,
        premises_ref: &str,
        actions: &[EnforcementAction],
    ) -> Result<u64, sqlx::Error> {
        sqlx::query("DELETE FROM enforcement_actions WHERE premises_ref = $1")
            .bind(premises_ref)
            .execute(&mut *conn)
            .await?;

        let mut inserted = 0;
        for action in actions {
            let result = sqlx::query(
                "INSERT INTO enforcement_actions (premises_ref, action_date, action_type, detail)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(premises_ref)
            .bind(action.action_date)
            .bind(&action.action_type)
            .bind(&action.detail)
            .execute(&mut *conn)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }
}
