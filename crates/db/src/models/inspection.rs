//! Inspection table model.

use chrono::NaiveDate;
use hygiene_core::error::CoreError;
use hygiene_core::inspection::{Inspection, InspectionStatus, InspectionType};
use hygiene_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `inspections` table.
#[derive(Debug, Clone, FromRow)]
pub struct InspectionRow {
    pub id: DbId,
    pub premises_ref: String,
    pub reference_number: String,
    pub inspection_date: Option<NaiveDate>,
    pub inspection_time: Option<String>,
    pub inspection_type: String,
    pub inspector_name: Option<String>,
    pub inspector_id: Option<String>,
    pub hygienic_score: Option<i32>,
    pub structure_score: Option<i32>,
    pub management_score: Option<i32>,
    pub total_score: Option<i32>,
    pub fhrs_rating: Option<i32>,
    pub enforcement_actions: Option<String>,
    pub actions_required: Option<String>,
    pub revisit_required: bool,
    pub revisit_date: Option<NaiveDate>,
    pub additional_notes: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl TryFrom<InspectionRow> for Inspection {
    type Error = CoreError;

    fn try_from(row: InspectionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            inspection_type: InspectionType::from_str_value(&row.inspection_type)?,
            status: InspectionStatus::from_str_value(&row.status)?,
            id: row.id,
            premises_ref: row.premises_ref,
            reference_number: row.reference_number,
            inspection_date: row.inspection_date,
            inspection_time: row.inspection_time,
            inspector_name: row.inspector_name,
            inspector_id: row.inspector_id,
            hygienic_score: row.hygienic_score,
            structure_score: row.structure_score,
            management_score: row.management_score,
            total_score: row.total_score,
            fhrs_rating: row.fhrs_rating,
            enforcement_actions: row.enforcement_actions,
            actions_required: row.actions_required,
            revisit_required: row.revisit_required,
            revisit_date: row.revisit_date,
            additional_notes: row.additional_notes,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn row(inspection_type: &str, status: &str) -> InspectionRow {
        InspectionRow {
            id: 7,
            premises_ref: "FP/1".to_string(),
            reference_number: "FHI-20240301-00000007".to_string(),
            inspection_date: None,
            inspection_time: None,
            inspection_type: inspection_type.to_string(),
            inspector_name: None,
            inspector_id: None,
            hygienic_score: None,
            structure_score: None,
            management_score: None,
            total_score: None,
            fhrs_rating: None,
            enforcement_actions: None,
            actions_required: None,
            revisit_required: false,
            revisit_date: None,
            additional_notes: None,
            status: status.to_string(),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    #[test]
    fn converts_known_values() {
        let inspection = Inspection::try_from(row("new_business", "scheduled")).unwrap();
        assert_eq!(inspection.inspection_type, InspectionType::NewBusiness);
        assert_eq!(inspection.status, InspectionStatus::Scheduled);
    }

    #[test]
    fn rejects_unknown_stored_values() {
        assert_matches!(
            Inspection::try_from(row("audit", "scheduled")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            Inspection::try_from(row("routine", "cancelled")),
            Err(CoreError::Validation(_))
        );
    }
}
