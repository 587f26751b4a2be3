//! Test doubles for the data-store traits.

use async_trait::async_trait;

use super::memory::MemoryDataStore;
use super::DataStore;
use crate::error::CoreError;
use crate::inspection::Inspection;
use crate::premises::{EnforcementAction, Premises};
use crate::types::Timestamp;

/// Delegates to a [`MemoryDataStore`] but loses its connection whenever the
/// action history of one reference is requested.
pub struct FailingHistoryStore {
    pub inner: MemoryDataStore,
    pub failing_ref: String,
}

impl FailingHistoryStore {
    pub fn new(inner: MemoryDataStore, failing_ref: impl Into<String>) -> Self {
        Self {
            inner,
            failing_ref: failing_ref.into(),
        }
    }
}

#[async_trait]
impl DataStore for FailingHistoryStore {
    async fn get_premises(&self, premises_ref: &str) -> Result<Option<Premises>, CoreError> {
        self.inner.get_premises(premises_ref).await
    }

    async fn get_all_premises(&self) -> Result<Vec<Premises>, CoreError> {
        self.inner.get_all_premises().await
    }

    async fn get_previous_actions(
        &self,
        premises_ref: &str,
    ) -> Result<Vec<EnforcementAction>, CoreError> {
        if premises_ref == self.failing_ref {
            return Err(CoreError::DataStoreUnavailable(format!(
                "connection reset reading actions for {premises_ref}"
            )));
        }
        self.inner.get_previous_actions(premises_ref).await
    }

    async fn get_inspections_for_premises(
        &self,
        premises_ref: &str,
    ) -> Result<Vec<Inspection>, CoreError> {
        self.inner.get_inspections_for_premises(premises_ref).await
    }

    async fn get_premises_due_inspection(
        &self,
        within_months: u32,
        now: Timestamp,
    ) -> Result<Vec<Premises>, CoreError> {
        self.inner.get_premises_due_inspection(within_months, now).await
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        self.inner.health_check().await
    }
}
