//! In-process [`DataStore`] / [`RecordStore`] backed by a `tokio` RwLock.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{due_order_key, due_window_cutoff, is_due_within, DataStore, RecordStore};
use crate::error::CoreError;
use crate::inspection::{
    apply_outcome, generate_reference_number, Inspection, InspectionOutcome, InspectionStatus,
    NewInspection,
};
use crate::premises::{sort_actions_newest_first, EnforcementAction, Premises};
use crate::types::{DbId, Timestamp};

#[derive(Default)]
struct Inner {
    premises: BTreeMap<String, Premises>,
    actions: HashMap<String, Vec<EnforcementAction>>,
    inspections: BTreeMap<DbId, Inspection>,
    next_inspection_id: DbId,
}

/// Thread-safe in-memory store. Every read returns an owned snapshot.
#[derive(Default)]
pub struct MemoryDataStore {
    inner: RwLock<Inner>,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with premises and their histories.
    pub async fn with_premises(
        records: impl IntoIterator<Item = (Premises, Vec<EnforcementAction>)>,
    ) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write().await;
            for (premises, actions) in records {
                inner.actions.insert(premises.premises_ref.clone(), actions);
                inner.premises.insert(premises.premises_ref.clone(), premises);
            }
        }
        store
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn get_premises(&self, premises_ref: &str) -> Result<Option<Premises>, CoreError> {
        Ok(self.inner.read().await.premises.get(premises_ref).cloned())
    }

    async fn get_all_premises(&self) -> Result<Vec<Premises>, CoreError> {
        let mut all: Vec<Premises> = self.inner.read().await.premises.values().cloned().collect();
        all.sort_by(|a, b| {
            a.business_name
                .cmp(&b.business_name)
                .then_with(|| a.premises_ref.cmp(&b.premises_ref))
        });
        Ok(all)
    }

    async fn get_previous_actions(
        &self,
        premises_ref: &str,
    ) -> Result<Vec<EnforcementAction>, CoreError> {
        let mut actions = self
            .inner
            .read()
            .await
            .actions
            .get(premises_ref)
            .cloned()
            .unwrap_or_default();
        sort_actions_newest_first(&mut actions);
        Ok(actions)
    }

    async fn get_inspections_for_premises(
        &self,
        premises_ref: &str,
    ) -> Result<Vec<Inspection>, CoreError> {
        let mut inspections: Vec<Inspection> = self
            .inner
            .read()
            .await
            .inspections
            .values()
            .filter(|i| i.premises_ref == premises_ref)
            .cloned()
            .collect();
        // Newest date first, undated last, later ids first within a date.
        inspections.sort_by(|a, b| {
            match (a.inspection_date, b.inspection_date) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| b.id.cmp(&a.id))
        });
        Ok(inspections)
    }

    async fn get_premises_due_inspection(
        &self,
        within_months: u32,
        now: Timestamp,
    ) -> Result<Vec<Premises>, CoreError> {
        let cutoff = due_window_cutoff(within_months, now);
        let mut due: Vec<Premises> = self
            .inner
            .read()
            .await
            .premises
            .values()
            .filter(|p| is_due_within(p, cutoff))
            .cloned()
            .collect();
        due.sort_by(|a, b| due_order_key(a).cmp(&due_order_key(b)));
        Ok(due)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryDataStore {
    async fn upsert_premises(
        &self,
        premises: Premises,
        actions: Vec<EnforcementAction>,
    ) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        inner.actions.insert(premises.premises_ref.clone(), actions);
        inner.premises.insert(premises.premises_ref.clone(), premises);
        Ok(())
    }

    async fn create_inspection(
        &self,
        input: NewInspection,
        now: Timestamp,
    ) -> Result<Inspection, CoreError> {
        let mut inner = self.inner.write().await;
        if !inner.premises.contains_key(&input.premises_ref) {
            return Err(CoreError::premises_not_found(input.premises_ref));
        }

        inner.next_inspection_id += 1;
        let inspection = Inspection {
            id: inner.next_inspection_id,
            reference_number: generate_reference_number(now),
            premises_ref: input.premises_ref,
            inspection_date: input.inspection_date,
            inspection_time: input.inspection_time,
            inspection_type: input.inspection_type,
            inspector_name: input.inspector_name,
            inspector_id: input.inspector_id,
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
            status: InspectionStatus::Scheduled,
            created_at: now,
            completed_at: None,
        };
        inner.inspections.insert(inspection.id, inspection.clone());
        Ok(inspection)
    }

    async fn get_inspection(&self, id: DbId) -> Result<Option<Inspection>, CoreError> {
        Ok(self.inner.read().await.inspections.get(&id).cloned())
    }

    async fn complete_inspection(
        &self,
        id: DbId,
        outcome: &InspectionOutcome,
        now: Timestamp,
    ) -> Result<Inspection, CoreError> {
        let mut inner = self.inner.write().await;
        let inspection = inner.inspections.get_mut(&id).ok_or_else(|| CoreError::NotFound {
            entity: "Inspection",
            reference: id.to_string(),
        })?;
        apply_outcome(inspection, outcome, now)?;
        Ok(inspection.clone())
    }
}
