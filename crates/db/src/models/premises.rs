//! Premises table model.

use chrono::NaiveDate;
use hygiene_core::catalog::RiskCategory;
use hygiene_core::premises::{Premises, ACTIVE_APPROVAL_STATUS};
use sqlx::FromRow;

/// A row from the `premises` table.
#[derive(Debug, Clone, FromRow)]
pub struct PremisesRow {
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
    pub risk_category: Option<String>,
    pub current_fhrs_rating: Option<i32>,
    pub registration_date: Option<NaiveDate>,
    pub last_inspection_date: Option<NaiveDate>,
    pub last_hygienic_score: Option<i32>,
    pub last_structure_score: Option<i32>,
    pub last_management_score: Option<i32>,
    pub next_inspection_due: Option<NaiveDate>,
    pub trading_hours: Option<String>,
    pub water_supply: Option<String>,
    pub approval_status: Option<String>,
    pub allergen_documentation: Option<bool>,
    pub haccp_in_place: Option<bool>,
    pub primary_authority: Option<String>,
    pub notes: Option<String>,
}

impl From<PremisesRow> for Premises {
    /// Stored rows may predate the column defaults; missing flags read as
    /// false and a missing status as registered.
    fn from(row: PremisesRow) -> Self {
        Self {
            premises_ref: row.premises_ref,
            uprn: row.uprn,
            business_name: row.business_name,
            trading_name: row.trading_name,
            business_type: row.business_type,
            business_type_detail: row.business_type_detail,
            food_business_operator: row.food_business_operator,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            town: row.town,
            county: row.county,
            postcode: row.postcode,
            telephone: row.telephone,
            email: row.email,
            number_of_food_handlers: row.number_of_food_handlers,
            risk_category: row.risk_category.as_deref().and_then(RiskCategory::parse),
            current_fhrs_rating: row.current_fhrs_rating,
            registration_date: row.registration_date,
            last_inspection_date: row.last_inspection_date,
            last_hygienic_score: row.last_hygienic_score,
            last_structure_score: row.last_structure_score,
            last_management_score: row.last_management_score,
            next_inspection_due: row.next_inspection_due,
            trading_hours: row.trading_hours,
            water_supply: row.water_supply,
            approval_status: row
                .approval_status
                .unwrap_or_else(|| ACTIVE_APPROVAL_STATUS.to_string()),
            allergen_documentation: row.allergen_documentation.unwrap_or(false),
            haccp_in_place: row.haccp_in_place.unwrap_or(false),
            primary_authority: row.primary_authority,
            notes: row.notes,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_row(premises_ref: &str) -> PremisesRow {
    PremisesRow {
        premises_ref: premises_ref.to_string(),
        uprn: None,
        business_name: "Sample Bakery".to_string(),
        trading_name: None,
        business_type: Some("retail".to_string()),
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
        risk_category: Some("d".to_string()),
        current_fhrs_rating: Some(4),
        registration_date: None,
        last_inspection_date: None,
        last_hygienic_score: None,
        last_structure_score: None,
        last_management_score: None,
        next_inspection_due: None,
        trading_hours: None,
        water_supply: None,
        approval_status: None,
        allergen_documentation: None,
        haccp_in_place: Some(true),
        primary_authority: None,
        notes: None,
    }
}
