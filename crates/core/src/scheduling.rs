//! Risk-based inspection priority scoring and work-list scheduling.
//!
//! Lower scores are more urgent. The pure functions here take an explicit
//! `now` so results are reproducible; [`InspectionScheduler`] wires them to a
//! [`DataStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;

use crate::catalog::{InspectionCatalog, RiskCategory};
use crate::error::CoreError;
use crate::premises::{requires_revisit, EnforcementAction, EnforcementKind, Premises};
use crate::store::DataStore;
use crate::types::{days_until, is_before, Timestamp};

// ---------------------------------------------------------------------------
// Scoring constants
// ---------------------------------------------------------------------------

/// Base weight for a premises with no recognised risk category.
pub const UNKNOWN_CATEGORY_WEIGHT: f64 = 25.0;

/// Adjustment when no due date has ever been set.
pub const NO_DUE_DATE_ADJUSTMENT: f64 = -20.0;
/// Overdue days are divided by this before being added.
pub const OVERDUE_DIVISOR: f64 = 3.0;
/// The overdue term never goes below this.
pub const OVERDUE_FLOOR: f64 = -50.0;
/// Days until due are divided by this before being added.
pub const UPCOMING_DIVISOR: f64 = 6.0;
/// The upcoming term never exceeds this.
pub const UPCOMING_CAP: f64 = 50.0;

/// Penalty per prior enforcement action, applied to at most
/// [`ENFORCEMENT_COUNT_CAP`] actions.
pub const ENFORCEMENT_COUNT_PENALTY: f64 = 10.0;
pub const ENFORCEMENT_COUNT_CAP: usize = 3;

/// Points per published FHRS star.
pub const RATING_MULTIPLIER: f64 = 5.0;
/// Adjustment for premises without a published rating.
pub const UNRATED_ADJUSTMENT: f64 = -10.0;
/// Adjustment for premises that have never been inspected.
pub const NEVER_INSPECTED_ADJUSTMENT: f64 = -30.0;

/// Largest look-ahead window accepted by the scheduler, in months.
pub const MAX_WITHIN_MONTHS: u32 = 60;

/// Base weight for a risk category (A = 0 … E = 40).
pub fn risk_category_weight(category: Option<RiskCategory>) -> f64 {
    match category {
        Some(RiskCategory::A) => 0.0,
        Some(RiskCategory::B) => 10.0,
        Some(RiskCategory::C) => 20.0,
        Some(RiskCategory::D) => 30.0,
        Some(RiskCategory::E) => 40.0,
        None => UNKNOWN_CATEGORY_WEIGHT,
    }
}

/// Per-action severity adjustment. Not capped by count.
pub fn enforcement_severity(kind: EnforcementKind) -> f64 {
    match kind {
        EnforcementKind::EmergencyProhibitionNotice => -20.0,
        EnforcementKind::HygieneImprovementNotice => -15.0,
        EnforcementKind::WrittenWarning => -5.0,
        EnforcementKind::Other => 0.0,
    }
}

/// Round half towards positive infinity: 12.5 -> 13, -12.5 -> -12.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Reject look-ahead windows outside `1..=MAX_WITHIN_MONTHS`.
pub fn validate_within_months(months: u32) -> Result<(), CoreError> {
    if months == 0 || months > MAX_WITHIN_MONTHS {
        return Err(CoreError::Validation(format!(
            "within_months must be between 1 and {MAX_WITHIN_MONTHS}, got {months}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Priority score
// ---------------------------------------------------------------------------

/// The unrounded contribution of each scoring term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityBreakdown {
    pub risk_category: f64,
    pub due_date: f64,
    pub enforcement_count: f64,
    pub enforcement_severity: f64,
    pub rating: f64,
    pub never_inspected: f64,
}

impl PriorityBreakdown {
    pub fn raw_total(&self) -> f64 {
        self.risk_category
            + self.due_date
            + self.enforcement_count
            + self.enforcement_severity
            + self.rating
            + self.never_inspected
    }
}

/// Result of scoring one premises.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityScoreResult {
    pub score: i64,
    pub breakdown: PriorityBreakdown,
    pub actions: Vec<EnforcementAction>,
}

fn due_date_term(premises: &Premises, now: Timestamp) -> f64 {
    let Some(due) = premises.next_inspection_due else {
        return NO_DUE_DATE_ADJUSTMENT;
    };

    let days = days_until(due, now) as f64;
    if days < 0.0 {
        (days / OVERDUE_DIVISOR).max(OVERDUE_FLOOR)
    } else {
        (days / UPCOMING_DIVISOR).min(UPCOMING_CAP)
    }
}

/// Score one premises against its full enforcement history.
pub fn calculate_priority_score(
    premises: &Premises,
    actions: &[EnforcementAction],
    now: Timestamp,
) -> PriorityScoreResult {
    let enforcement_count = if actions.is_empty() {
        0.0
    } else {
        -ENFORCEMENT_COUNT_PENALTY * actions.len().min(ENFORCEMENT_COUNT_CAP) as f64
    };

    let breakdown = PriorityBreakdown {
        risk_category: risk_category_weight(premises.risk_category),
        due_date: due_date_term(premises, now),
        enforcement_count,
        enforcement_severity: actions
            .iter()
            .map(|a| enforcement_severity(a.kind()))
            .sum(),
        rating: match premises.current_fhrs_rating {
            Some(rating) => rating as f64 * RATING_MULTIPLIER,
            None => UNRATED_ADJUSTMENT,
        },
        never_inspected: if premises.is_new_business() {
            NEVER_INSPECTED_ADJUSTMENT
        } else {
            0.0
        },
    };

    PriorityScoreResult {
        score: round_half_up(breakdown.raw_total()),
        breakdown,
        actions: actions.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Work-list
// ---------------------------------------------------------------------------

/// One entry of the prioritised inspection work-list.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledInspection {
    #[serde(flatten)]
    pub premises: Premises,
    pub priority_score: i64,
    pub is_overdue: bool,
    pub days_until_due: Option<i64>,
    pub previous_actions: Vec<EnforcementAction>,
    pub interval_description: String,
    pub inspection_interval_months: u32,
    pub is_new_business: bool,
    pub requires_revisit: bool,
}

/// Score and sort premises (with their action histories) into a work-list.
///
/// Sorting is stable: premises with equal scores keep the order they were
/// given in, which for the due-inspection query is category, due date, then
/// reference.
pub fn build_schedule(
    entries: Vec<(Premises, Vec<EnforcementAction>)>,
    catalog: &InspectionCatalog,
    now: Timestamp,
) -> Vec<ScheduledInspection> {
    let mut scheduled: Vec<ScheduledInspection> = entries
        .into_iter()
        .map(|(premises, actions)| {
            let priority = calculate_priority_score(&premises, &actions, now);
            let interval = catalog.interval(premises.risk_category);
            let due = premises.next_inspection_due;

            ScheduledInspection {
                priority_score: priority.score,
                is_overdue: due.is_some_and(|d| is_before(d, now)),
                days_until_due: due.map(|d| days_until(d, now)),
                requires_revisit: requires_revisit(&actions),
                is_new_business: premises.is_new_business(),
                interval_description: interval.description,
                inspection_interval_months: interval.months,
                previous_actions: priority.actions,
                premises,
            }
        })
        .collect();

    scheduled.sort_by_key(|s| s.priority_score);
    scheduled
}

// ---------------------------------------------------------------------------
// Workload summary
// ---------------------------------------------------------------------------

/// Bucket key for premises with no category or business type.
pub const UNKNOWN_BUCKET: &str = "Unknown";

/// Aggregate counts over a scheduled work-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkloadSummary {
    pub total_due: usize,
    pub overdue: usize,
    pub new_businesses: usize,
    pub requires_revisit: usize,
    pub by_risk_category: BTreeMap<String, usize>,
    pub by_business_type: BTreeMap<String, usize>,
    /// Keyed by `YYYY-MM` of the due date. Undated premises are left out.
    pub by_month: BTreeMap<String, usize>,
}

pub fn summarise_workload(scheduled: &[ScheduledInspection]) -> WorkloadSummary {
    let mut summary = WorkloadSummary {
        total_due: scheduled.len(),
        ..Default::default()
    };

    for item in scheduled {
        summary.overdue += usize::from(item.is_overdue);
        summary.new_businesses += usize::from(item.is_new_business);
        summary.requires_revisit += usize::from(item.requires_revisit);

        let category = item
            .premises
            .risk_category
            .map_or(UNKNOWN_BUCKET, RiskCategory::as_str);
        *summary
            .by_risk_category
            .entry(category.to_string())
            .or_default() += 1;

        let business_type = item
            .premises
            .business_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_BUCKET);
        *summary
            .by_business_type
            .entry(business_type.to_string())
            .or_default() += 1;

        if let Some(due) = item.premises.next_inspection_due {
            *summary
                .by_month
                .entry(due.format("%Y-%m").to_string())
                .or_default() += 1;
        }
    }

    summary
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Builds prioritised work-lists from the data store.
#[derive(Clone)]
pub struct InspectionScheduler {
    store: Arc<dyn DataStore>,
    catalog: Arc<InspectionCatalog>,
}

impl InspectionScheduler {
    pub fn new(store: Arc<dyn DataStore>, catalog: Arc<InspectionCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Score a single premises, fetching its enforcement history.
    pub async fn priority_score(
        &self,
        premises: &Premises,
        now: Timestamp,
    ) -> Result<PriorityScoreResult, CoreError> {
        let actions = self.store.get_previous_actions(&premises.premises_ref).await?;
        Ok(calculate_priority_score(premises, &actions, now))
    }

    /// Premises due within `within_months`, most urgent first.
    pub async fn scheduled_inspections(
        &self,
        within_months: u32,
        now: Timestamp,
    ) -> Result<Vec<ScheduledInspection>, CoreError> {
        validate_within_months(within_months)?;

        let due = self
            .store
            .get_premises_due_inspection(within_months, now)
            .await?;

        let histories = try_join_all(
            due.iter()
                .map(|p| self.store.get_previous_actions(&p.premises_ref)),
        )
        .await?;

        let scheduled = build_schedule(due.into_iter().zip(histories).collect(), &self.catalog, now);

        tracing::info!(
            within_months,
            count = scheduled.len(),
            overdue = scheduled.iter().filter(|s| s.is_overdue).count(),
            "Built inspection schedule"
        );

        Ok(scheduled)
    }

    /// Aggregate workload over the same window.
    pub async fn workload_summary(
        &self,
        within_months: u32,
        now: Timestamp,
    ) -> Result<WorkloadSummary, CoreError> {
        let scheduled = self.scheduled_inspections(within_months, now).await?;
        Ok(summarise_workload(&scheduled))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
