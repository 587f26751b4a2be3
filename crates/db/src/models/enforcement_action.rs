//! Enforcement action table model.

use chrono::NaiveDate;
use hygiene_core::premises::EnforcementAction;
use hygiene_core::types::DbId;
use sqlx::FromRow;

/// A row from the `enforcement_actions` table.
#[derive(Debug, Clone, FromRow)]
pub struct EnforcementActionRow {
    pub id: DbId,
    pub premises_ref: String,
    pub action_date: Option<NaiveDate>,
    pub action_type: String,
    pub detail: String,
}

impl From<EnforcementActionRow> for EnforcementAction {
    fn from(row: EnforcementActionRow) -> Self {
        EnforcementAction::new(row.action_date, row.action_type, row.detail)
    }
}
