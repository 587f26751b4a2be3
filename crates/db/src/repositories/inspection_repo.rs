//! Repository for the `inspections` table.

use hygiene_core::inspection::{Inspection, InspectionStatus, NewInspection};
use hygiene_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::inspection::InspectionRow;

/// Column list for inspections queries.
const COLUMNS: &str = "id, premises_ref, reference_number, inspection_date, inspection_time, \
    inspection_type, inspector_name, inspector_id, hygienic_score, structure_score, \
    management_score, total_score, fhrs_rating, enforcement_actions, actions_required, \
    revisit_required, revisit_date, additional_notes, status, created_at, completed_at";

pub struct InspectionRepo;

impl InspectionRepo {
    /// Find an inspection by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<InspectionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspections WHERE id = $1");
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock an inspection row for the rest of the transaction.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<InspectionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspections WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Inspections for one premises, newest first.
    pub async fn list_for_premises(
        pool: &PgPool,
        premises_ref: &str,
    ) -> Result<Vec<InspectionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections
             WHERE premises_ref = $1
             ORDER BY inspection_date DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(premises_ref)
            .fetch_all(pool)
            .await
    }

    /// Insert a scheduled inspection, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewInspection,
        reference_number: &str,
    ) -> Result<InspectionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO inspections (
                premises_ref, reference_number, inspection_date, inspection_time,
                inspection_type, inspector_name, inspector_id, status
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(&input.premises_ref)
            .bind(reference_number)
            .bind(input.inspection_date)
            .bind(&input.inspection_time)
            .bind(input.inspection_type.as_str())
            .bind(&input.inspector_name)
            .bind(&input.inspector_id)
            .bind(InspectionStatus::Scheduled.as_str())
            .fetch_one(pool)
            .await
    }

    /// Persist the result fields of a completed inspection.
    pub async fn save_outcome(
        conn: &mut PgConnection,
        inspection: &Inspection,
    ) -> Result<InspectionRow, sqlx::Error> {
        let query = format!(
            "UPDATE inspections SET
                hygienic_score = $2,
                structure_score = $3,
                management_score = $4,
                total_score = $5,
                fhrs_rating = $6,
                enforcement_actions = $7,
                actions_required = $8,
                revisit_required = $9,
                revisit_date = $10,
                additional_notes = $11,
                status = $12,
                completed_at = $13
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InspectionRow>(&query)
            .bind(inspection.id)
            .bind(inspection.hygienic_score)
            .bind(inspection.structure_score)
            .bind(inspection.management_score)
            .bind(inspection.total_score)
            .bind(inspection.fhrs_rating)
            .bind(&inspection.enforcement_actions)
            .bind(&inspection.actions_required)
            .bind(inspection.revisit_required)
            .bind(inspection.revisit_date)
            .bind(&inspection.additional_notes)
            .bind(inspection.status.as_str())
            .bind(inspection.completed_at)
            .fetch_one(conn)
            .await
    }
}
