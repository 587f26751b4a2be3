//! Inspection records: scheduling a visit and recording its outcome.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::fhrs::rating_for_total_score;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Inspection type
// ---------------------------------------------------------------------------

pub const TYPE_ROUTINE: &str = "routine";
pub const TYPE_FOLLOWUP: &str = "followup";
pub const TYPE_COMPLAINT: &str = "complaint";
pub const TYPE_NEW_BUSINESS: &str = "new_business";
pub const TYPE_REVISIT: &str = "revisit";

/// All valid inspection type strings.
pub const VALID_INSPECTION_TYPES: &[&str] = &[
    TYPE_ROUTINE,
    TYPE_FOLLOWUP,
    TYPE_COMPLAINT,
    TYPE_NEW_BUSINESS,
    TYPE_REVISIT,
];

/// Why an inspection is being carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionType {
    #[default]
    Routine,
    Followup,
    Complaint,
    NewBusiness,
    Revisit,
}

impl InspectionType {
    /// Convert from a stored or user-supplied string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            TYPE_ROUTINE => Ok(Self::Routine),
            TYPE_FOLLOWUP => Ok(Self::Followup),
            TYPE_COMPLAINT => Ok(Self::Complaint),
            TYPE_NEW_BUSINESS => Ok(Self::NewBusiness),
            TYPE_REVISIT => Ok(Self::Revisit),
            _ => Err(CoreError::Validation(format!(
                "Invalid inspection type '{s}'. Must be one of: {}",
                VALID_INSPECTION_TYPES.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Routine => TYPE_ROUTINE,
            Self::Followup => TYPE_FOLLOWUP,
            Self::Complaint => TYPE_COMPLAINT,
            Self::NewBusiness => TYPE_NEW_BUSINESS,
            Self::Revisit => TYPE_REVISIT,
        }
    }

    /// Display label printed on visit sheets.
    pub fn label(self) -> &'static str {
        match self {
            Self::Routine => "Routine Inspection",
            Self::Followup => "Follow-up Inspection",
            Self::Complaint => "Complaint Investigation",
            Self::NewBusiness => "New Business Registration Inspection",
            Self::Revisit => "Re-visit",
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Scheduled,
    Completed,
}

impl InspectionStatus {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_SCHEDULED => Ok(Self::Scheduled),
            STATUS_COMPLETED => Ok(Self::Completed),
            _ => Err(CoreError::Validation(format!(
                "Invalid inspection status '{s}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => STATUS_SCHEDULED,
            Self::Completed => STATUS_COMPLETED,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Prefix of generated inspection reference numbers.
pub const REFERENCE_PREFIX: &str = "FHI";

/// A scheduled or completed inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub id: DbId,
    pub premises_ref: String,
    pub reference_number: String,
    pub inspection_date: Option<NaiveDate>,
    pub inspection_time: Option<String>,
    pub inspection_type: InspectionType,
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
    pub status: InspectionStatus,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// Input for scheduling a new inspection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewInspection {
    #[validate(length(min = 1, message = "premises_ref must not be empty"))]
    pub premises_ref: String,
    pub inspection_date: Option<NaiveDate>,
    pub inspection_time: Option<String>,
    #[serde(default)]
    pub inspection_type: InspectionType,
    pub inspector_name: Option<String>,
    pub inspector_id: Option<String>,
}

/// Results recorded when an inspection is completed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InspectionOutcome {
    #[validate(range(min = 0, max = 25))]
    pub hygienic_score: Option<i32>,
    #[validate(range(min = 0, max = 25))]
    pub structure_score: Option<i32>,
    #[validate(range(min = 0, max = 30))]
    pub management_score: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    pub fhrs_rating: Option<i32>,
    pub enforcement_actions: Option<String>,
    pub actions_required: Option<String>,
    #[serde(default)]
    pub revisit_required: bool,
    pub revisit_date: Option<NaiveDate>,
    pub additional_notes: Option<String>,
}

impl InspectionOutcome {
    /// Sum of the category scores; missing scores count as zero.
    pub fn total_score(&self) -> i32 {
        self.hygienic_score.unwrap_or(0)
            + self.structure_score.unwrap_or(0)
            + self.management_score.unwrap_or(0)
    }

    /// The supplied rating, or the one derived from the total score.
    pub fn resolved_rating(&self) -> i32 {
        self.fhrs_rating
            .unwrap_or_else(|| rating_for_total_score(self.total_score()))
    }
}

/// Generate a reference number such as `FHI-20240301-1A2B3C4D`.
pub fn generate_reference_number(now: Timestamp) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{REFERENCE_PREFIX}-{}-{}",
        now.format("%Y%m%d"),
        suffix[..8].to_ascii_uppercase()
    )
}

/// Reject completion of an inspection that has already been completed.
pub fn ensure_completable(inspection: &Inspection) -> Result<(), CoreError> {
    match inspection.status {
        InspectionStatus::Scheduled => Ok(()),
        InspectionStatus::Completed => Err(CoreError::Conflict(format!(
            "Inspection {} is already completed",
            inspection.reference_number
        ))),
    }
}

/// Apply an outcome to a scheduled inspection, marking it completed.
pub fn apply_outcome(
    inspection: &mut Inspection,
    outcome: &InspectionOutcome,
    now: Timestamp,
) -> Result<(), CoreError> {
    ensure_completable(inspection)?;

    inspection.hygienic_score = outcome.hygienic_score;
    inspection.structure_score = outcome.structure_score;
    inspection.management_score = outcome.management_score;
    inspection.total_score = Some(outcome.total_score());
    inspection.fhrs_rating = Some(outcome.resolved_rating());
    inspection.enforcement_actions = outcome.enforcement_actions.clone();
    inspection.actions_required = outcome.actions_required.clone();
    inspection.revisit_required = outcome.revisit_required;
    inspection.revisit_date = outcome.revisit_date;
    inspection.additional_notes = outcome.additional_notes.clone();
    inspection.status = InspectionStatus::Completed;
    inspection.completed_at = Some(now);
    Ok(())
}
