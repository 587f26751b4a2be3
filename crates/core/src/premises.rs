//! Premises and enforcement-action records as the core consumes them.
//!
//! Records arrive fully defaulted: the `db` crate and [`crate::sync`] apply
//! every defaulting rule before handing them over, so nothing here coalesces
//! optional fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::RiskCategory;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Approval status of premises that are trading and eligible for inspection.
pub const ACTIVE_APPROVAL_STATUS: &str = "Registered";

pub const ACTION_EMERGENCY_PROHIBITION: &str = "Emergency Prohibition Notice";
pub const ACTION_HYGIENE_IMPROVEMENT: &str = "Hygiene Improvement Notice";
pub const ACTION_WRITTEN_WARNING: &str = "Written Warning";

// ---------------------------------------------------------------------------
// Premises
// ---------------------------------------------------------------------------

/// A registered food business, mirrored from the back-office system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Premises {
    pub premises_ref: String,
    pub uprn: Option<String>,
    pub business_name: String,
    pub trading_name: Option<String>,
    pub business_type: Option<String>,
    pub business_type_detail: Option<String>,
    pub food_business_operator: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub number_of_food_handlers: Option<i32>,
    pub risk_category: Option<RiskCategory>,
    pub current_fhrs_rating: Option<i32>,
    pub registration_date: Option<NaiveDate>,
    pub last_inspection_date: Option<NaiveDate>,
    pub last_hygienic_score: Option<i32>,
    pub last_structure_score: Option<i32>,
    pub last_management_score: Option<i32>,
    pub next_inspection_due: Option<NaiveDate>,
    pub trading_hours: Option<String>,
    pub water_supply: Option<String>,
    pub approval_status: String,
    pub allergen_documentation: bool,
    pub haccp_in_place: bool,
    pub primary_authority: Option<String>,
    pub notes: Option<String>,
}

impl Premises {
    /// A registered premises with every optional field absent.
    pub fn new(premises_ref: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self {
            premises_ref: premises_ref.into(),
            uprn: None,
            business_name: business_name.into(),
            trading_name: None,
            business_type: None,
            business_type_detail: None,
            food_business_operator: None,
            address_line1: None,
            address_line2: None,
            town: None,
            county: None,
            postcode: None,
            telephone: None,
            email: None,
            number_of_food_handlers: None,
            risk_category: None,
            current_fhrs_rating: None,
            registration_date: None,
            last_inspection_date: None,
            last_hygienic_score: None,
            last_structure_score: None,
            last_management_score: None,
            next_inspection_due: None,
            trading_hours: None,
            water_supply: None,
            approval_status: ACTIVE_APPROVAL_STATUS.to_string(),
            allergen_documentation: false,
            haccp_in_place: false,
            primary_authority: None,
            notes: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.approval_status == ACTIVE_APPROVAL_STATUS
    }

    /// Never inspected by the authority.
    pub fn is_new_business(&self) -> bool {
        self.last_inspection_date.is_none()
    }
}

// ---------------------------------------------------------------------------
// Enforcement actions
// ---------------------------------------------------------------------------

/// Recognised enforcement action types. Free-text types map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforcementKind {
    EmergencyProhibitionNotice,
    HygieneImprovementNotice,
    WrittenWarning,
    Other,
}

impl EnforcementKind {
    pub fn from_action_type(action_type: &str) -> Self {
        match action_type {
            ACTION_EMERGENCY_PROHIBITION => Self::EmergencyProhibitionNotice,
            ACTION_HYGIENE_IMPROVEMENT => Self::HygieneImprovementNotice,
            ACTION_WRITTEN_WARNING => Self::WrittenWarning,
            _ => Self::Other,
        }
    }

    /// Formal notices that oblige a follow-up visit.
    pub fn requires_revisit(self) -> bool {
        matches!(
            self,
            Self::EmergencyProhibitionNotice | Self::HygieneImprovementNotice
        )
    }
}

/// A historical enforcement action against one premises. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementAction {
    pub action_date: Option<NaiveDate>,
    pub action_type: String,
    pub detail: String,
}

impl EnforcementAction {
    pub fn new(
        action_date: Option<NaiveDate>,
        action_type: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            action_date,
            action_type: action_type.into(),
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> EnforcementKind {
        EnforcementKind::from_action_type(&self.action_type)
    }
}

/// Whether any action in the history obliges a follow-up visit.
pub fn requires_revisit(actions: &[EnforcementAction]) -> bool {
    actions.iter().any(|a| a.kind().requires_revisit())
}

/// Sort actions newest first; undated actions go last.
pub fn sort_actions_newest_first(actions: &mut [EnforcementAction]) {
    actions.sort_by(|a, b| match (a.action_date, b.action_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
