//! Repository for the `premises` table.

use chrono::NaiveDate;
use hygiene_core::premises::{Premises, ACTIVE_APPROVAL_STATUS};
use sqlx::{PgConnection, PgPool};

use crate::models::premises::PremisesRow;

/// Column list for premises queries.
const COLUMNS: &str = "premises_ref, uprn, business_name, trading_name, business_type, \
    business_type_detail, food_business_operator, address_line1, address_line2, town, \
    county, postcode, telephone, email, number_of_food_handlers, risk_category, \
    current_fhrs_rating, registration_date, last_inspection_date, last_hygienic_score, \
    last_structure_score, last_management_score, next_inspection_due, trading_hours, \
    water_supply, approval_status, allergen_documentation, haccp_in_place, \
    primary_authority, notes";

/// Provides read and upsert operations for premises.
pub struct PremisesRepo;

impl PremisesRepo {
    /// Find a premises by its reference.
    pub async fn find_by_ref(
        pool: &PgPool,
        premises_ref: &str,
    ) -> Result<Option<PremisesRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM premises WHERE premises_ref = $1");
        sqlx::query_as::<_, PremisesRow>(&query)
            .bind(premises_ref)
            .fetch_optional(pool)
            .await
    }

    /// List all premises ordered by business name.
    pub async fn list(pool: &PgPool) -> Result<Vec<PremisesRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM premises ORDER BY business_name ASC, premises_ref ASC");
        sqlx::query_as::<_, PremisesRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Registered premises due on or before `cutoff`, or with no due date.
    ///
    /// Ordered by risk category (A first, unknown last), then due date with
    /// undated rows first, then reference.
    pub async fn list_due(
        pool: &PgPool,
        cutoff: NaiveDate,
    ) -> Result<Vec<PremisesRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM premises
             WHERE approval_status = $1
               AND (next_inspection_due <= $2 OR next_inspection_due IS NULL)
             ORDER BY
               CASE risk_category
                 WHEN 'A' THEN 1
                 WHEN 'B' THEN 2
                 WHEN 'C' THEN 3
                 WHEN 'D' THEN 4
                 WHEN 'E' THEN 5
                 ELSE 6
               END,
               next_inspection_due ASC NULLS FIRST,
               premises_ref ASC"
        );
        sqlx::query_as::<_, PremisesRow>(&query)
            .bind(ACTIVE_APPROVAL_STATUS)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// Insert or fully replace a premises keyed by reference.
    pub async fn upsert(conn: &mut PgConnection, p: &Premises) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO premises (
                premises_ref, uprn, business_name, trading_name, business_type,
                business_type_detail, food_business_operator, address_line1, address_line2,
                town, county, postcode, telephone, email, number_of_food_handlers,
                risk_category, current_fhrs_rating, registration_date, last_inspection_date,
                last_hygienic_score, last_structure_score, last_management_score,
                next_inspection_due, trading_hours, water_supply, approval_status,
                allergen_documentation, haccp_in_place, primary_authority, notes
             ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30
             )
             ON CONFLICT (premises_ref) DO UPDATE SET
                uprn = EXCLUDED.uprn,
                business_name = EXCLUDED.business_name,
                trading_name = EXCLUDED.trading_name,
                business_type = EXCLUDED.business_type,
                business_type_detail = EXCLUDED.business_type_detail,
                food_business_operator = EXCLUDED.food_business_operator,
                address_line1 = EXCLUDED.address_line1,
                address_line2 = EXCLUDED.address_line2,
                town = EXCLUDED.town,
                county = EXCLUDED.county,
                postcode = EXCLUDED.postcode,
                telephone = EXCLUDED.telephone,
                email = EXCLUDED.email,
                number_of_food_handlers = EXCLUDED.number_of_food_handlers,
                risk_category = EXCLUDED.risk_category,
                current_fhrs_rating = EXCLUDED.current_fhrs_rating,
                registration_date = EXCLUDED.registration_date,
                last_inspection_date = EXCLUDED.last_inspection_date,
                last_hygienic_score = EXCLUDED.last_hygienic_score,
                last_structure_score = EXCLUDED.last_structure_score,
                last_management_score = EXCLUDED.last_management_score,
                next_inspection_due = EXCLUDED.next_inspection_due,
                trading_hours = EXCLUDED.trading_hours,
                water_supply = EXCLUDED.water_supply,
                approval_status = EXCLUDED.approval_status,
                allergen_documentation = EXCLUDED.allergen_documentation,
                haccp_in_place = EXCLUDED.haccp_in_place,
                primary_authority = EXCLUDED.primary_authority,
                notes = EXCLUDED.notes,
                synced_at = now(),
                updated_at = now()",
        )
        .bind(&p.premises_ref)
        .bind(&p.uprn)
        .bind(&p.business_name)
        .bind(&p.trading_name)
        .bind(&p.business_type)
        .bind(&p.business_type_detail)
        .bind(&p.food_business_operator)
        .bind(&p.address_line1)
        .bind(&p.address_line2)
        .bind(&p.town)
        .bind(&p.county)
        .bind(&p.postcode)
        .bind(&p.telephone)
        .bind(&p.email)
        .bind(p.number_of_food_handlers)
        .bind(p.risk_category.map(|c| c.as_str()))
        .bind(p.current_fhrs_rating)
        .bind(p.registration_date)
        .bind(p.last_inspection_date)
        .bind(p.last_hygienic_score)
        .bind(p.last_structure_score)
        .bind(p.last_management_score)
        .bind(p.next_inspection_due)
        .bind(&p.trading_hours)
        .bind(&p.water_supply)
        .bind(&p.approval_status)
        .bind(p.allergen_documentation)
        .bind(p.haccp_in_place)
        .bind(&p.primary_authority)
        .bind(&p.notes)
        .execute(conn)
        .await?;
        Ok(())
    }
}
