//! Data-store abstraction.
//!
//! The scheduler and visit-sheet generator depend only on [`DataStore`];
//! the HTTP layer additionally needs the write side in [`RecordStore`].
//! The PostgreSQL implementation lives in the `db` crate, and
//! [`memory::MemoryDataStore`] backs tests and local runs.

pub mod memory;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::catalog::RiskCategory;
use crate::error::CoreError;
use crate::inspection::{Inspection, InspectionOutcome, NewInspection};
use crate::premises::{EnforcementAction, Premises};
use crate::types::{add_months, DbId, Timestamp};

/// Read-side queries used to build schedules and visit sheets.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Look up one premises by reference. `Ok(None)` when absent.
    async fn get_premises(&self, premises_ref: &str) -> Result<Option<Premises>, CoreError>;

    /// All premises regardless of status, ordered by business name.
    async fn get_all_premises(&self) -> Result<Vec<Premises>, CoreError>;

    /// Enforcement history for one premises, newest first.
    async fn get_previous_actions(
        &self,
        premises_ref: &str,
    ) -> Result<Vec<EnforcementAction>, CoreError>;

    /// Inspections recorded for one premises, newest first.
    async fn get_inspections_for_premises(
        &self,
        premises_ref: &str,
    ) -> Result<Vec<Inspection>, CoreError>;

    /// Registered premises due on or before `now + within_months` or with
    /// no due date, ordered by [`due_order_key`].
    async fn get_premises_due_inspection(
        &self,
        within_months: u32,
        now: Timestamp,
    ) -> Result<Vec<Premises>, CoreError>;

    /// Cheap connectivity probe.
    async fn health_check(&self) -> Result<(), CoreError>;
}

/// Write-side operations: feed import and the inspection lifecycle.
#[async_trait]
pub trait RecordStore: DataStore {
    /// Insert or replace a premises and its full enforcement history.
    async fn upsert_premises(
        &self,
        premises: Premises,
        actions: Vec<EnforcementAction>,
    ) -> Result<(), CoreError>;

    /// Schedule a new inspection. Fails with `NotFound` for an unknown
    /// premises.
    async fn create_inspection(
        &self,
        input: NewInspection,
        now: Timestamp,
    ) -> Result<Inspection, CoreError>;

    async fn get_inspection(&self, id: DbId) -> Result<Option<Inspection>, CoreError>;

    /// Record results and mark the inspection completed. Fails with
    /// `NotFound` for an unknown id and `Conflict` if already completed.
    async fn complete_inspection(
        &self,
        id: DbId,
        outcome: &InspectionOutcome,
        now: Timestamp,
    ) -> Result<Inspection, CoreError>;
}

/// Last due date (inclusive) that falls inside the look-ahead window.
pub fn due_window_cutoff(within_months: u32, now: Timestamp) -> NaiveDate {
    add_months(now, within_months)
}

/// Whether a premises belongs in the due-inspection list.
pub fn is_due_within(premises: &Premises, cutoff: NaiveDate) -> bool {
    premises.is_active() && premises.next_inspection_due.is_none_or(|due| due <= cutoff)
}

/// Sort key for due-inspection results: category A..E then unknown, undated
/// first, earliest due date, then reference.
pub fn due_order_key(premises: &Premises) -> (u8, Option<NaiveDate>, &str) {
    (
        RiskCategory::rank(premises.risk_category),
        premises.next_inspection_due,
        premises.premises_ref.as_str(),
    )
}
