//! Normalisation of premises records from the back-office sync feed.
//!
//! Feed records use camelCase keys and leave most fields optional. They are
//! turned into fully defaulted [`Premises`] before reaching any store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::RiskCategory;
use crate::error::CoreError;
use crate::premises::{EnforcementAction, Premises, ACTIVE_APPROVAL_STATUS};

/// Risk category assumed when the feed omits one.
pub const DEFAULT_RISK_CATEGORY: RiskCategory = RiskCategory::C;

/// Water supply assumed when the feed omits one.
pub const DEFAULT_WATER_SUPPLY: &str = "Mains";

// ---------------------------------------------------------------------------
// Feed shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedScores {
    #[validate(range(min = 0))]
    pub hygienic_food_handling: Option<i32>,
    #[validate(range(min = 0))]
    pub structure_and_cleaning: Option<i32>,
    #[validate(range(min = 0))]
    pub management_of_food_safety: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedAction {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub action_type: Option<String>,
    pub detail: Option<String>,
}

/// One premises as published by the sync feed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PremisesFeedRecord {
    pub premises_ref: Option<String>,
    pub uprn: Option<String>,
    pub business_name: Option<String>,
    pub trading_name: Option<String>,
    pub business_type: Option<String>,
    pub business_type_detail: Option<String>,
    pub food_business_operator: Option<String>,
    #[serde(default)]
    pub address: FeedAddress,
    pub telephone: Option<String>,
    pub email: Option<String>,
    #[validate(range(min = 0))]
    pub number_of_food_handlers: Option<i32>,
    pub risk_category: Option<String>,
    #[validate(range(min = 0, max = 5))]
    pub current_fhrs_rating: Option<i32>,
    pub registration_date: Option<NaiveDate>,
    pub last_inspection_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(nested)]
    pub last_inspection_scores: FeedScores,
    pub next_inspection_due: Option<NaiveDate>,
    pub trading_hours: Option<String>,
    pub water_supply: Option<String>,
    pub approval_status: Option<String>,
    #[serde(default)]
    pub allergen_documentation: bool,
    #[serde(default)]
    pub haccp_in_place: bool,
    pub primary_authority: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub previous_actions: Vec<FeedAction>,
}

/// A feed record after defaulting, ready to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPremises {
    pub premises: Premises,
    pub actions: Vec<EnforcementAction>,
}

/// Counts reported after an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub actions: usize,
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PremisesFeedRecord {
    /// Apply feed defaults. Fails when the reference or business name is
    /// missing or blank, the rating is outside 0..=5, or a score or
    /// handler count is negative.
    pub fn normalize(self) -> Result<NormalizedPremises, CoreError> {
        let premises_ref = non_blank(self.premises_ref.clone()).ok_or_else(|| {
            CoreError::Validation("premisesRef must not be blank".to_string())
        })?;
        self.validate()
            .map_err(|e| CoreError::Validation(format!("{premises_ref}: {e}")))?;
        let business_name = non_blank(self.business_name).ok_or_else(|| {
            CoreError::Validation(format!("businessName must not be blank ({premises_ref})"))
        })?;

        // An unrecognised category is kept as unknown rather than defaulted.
        let risk_category = match non_blank(self.risk_category) {
            Some(raw) => RiskCategory::parse(&raw),
            None => Some(DEFAULT_RISK_CATEGORY),
        };

        let actions = self
            .previous_actions
            .into_iter()
            .map(|a| EnforcementAction {
                action_date: a.date,
                action_type: non_blank(a.action_type).unwrap_or_default(),
                detail: non_blank(a.detail).unwrap_or_default(),
            })
            .collect();

        let premises = Premises {
            trading_name: non_blank(self.trading_name).or_else(|| Some(business_name.clone())),
            premises_ref,
            uprn: non_blank(self.uprn),
            business_name,
            business_type: non_blank(self.business_type),
            business_type_detail: non_blank(self.business_type_detail),
            food_business_operator: non_blank(self.food_business_operator),
            address_line1: non_blank(self.address.line1),
            address_line2: non_blank(self.address.line2),
            town: non_blank(self.address.town),
            county: non_blank(self.address.county),
            postcode: non_blank(self.address.postcode),
            telephone: non_blank(self.telephone),
            email: non_blank(self.email),
            number_of_food_handlers: self.number_of_food_handlers,
            risk_category,
            current_fhrs_rating: self.current_fhrs_rating,
            registration_date: self.registration_date,
            last_inspection_date: self.last_inspection_date,
            last_hygienic_score: self.last_inspection_scores.hygienic_food_handling,
            last_structure_score: self.last_inspection_scores.structure_and_cleaning,
            last_management_score: self.last_inspection_scores.management_of_food_safety,
            next_inspection_due: self.next_inspection_due,
            trading_hours: non_blank(self.trading_hours),
            water_supply: non_blank(self.water_supply)
                .or_else(|| Some(DEFAULT_WATER_SUPPLY.to_string())),
            approval_status: non_blank(self.approval_status)
                .unwrap_or_else(|| ACTIVE_APPROVAL_STATUS.to_string()),
            allergen_documentation: self.allergen_documentation,
            haccp_in_place: self.haccp_in_place,
            primary_authority: non_blank(self.primary_authority),
            notes: non_blank(self.notes),
        };

        Ok(NormalizedPremises { premises, actions })
    }
}
