//! Pre-populated inspection visit sheets.
//!
//! A visit sheet is the working document an officer carries into an
//! inspection. It projects the premises record, its enforcement history and
//! its business-type profile into a structured form, leaving every
//! assessment field blank for completion on site.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::catalog::{BusinessTypeProfile, CouncilDetails, InspectionCatalog, RiskCategory};
use crate::error::CoreError;
use crate::inspection::InspectionType;
use crate::premises::{requires_revisit, EnforcementAction, Premises};
use crate::scheduling::validate_within_months;
use crate::store::DataStore;
use crate::types::Timestamp;

pub const FORM_TITLE: &str = "Food Hygiene Inspection Visit Sheet";

/// Hygienic-handling sub-score at or above which the area is revisited.
pub const HYGIENIC_CONCERN_THRESHOLD: i32 = 15;
/// Structure sub-score at or above which the area is revisited.
pub const STRUCTURE_CONCERN_THRESHOLD: i32 = 15;
/// Management sub-score at or above which the area is revisited.
pub const MANAGEMENT_CONCERN_THRESHOLD: i32 = 20;

pub const FOCUS_HACCP: &str =
    "HACCP/Food Safety Management System - previously not in place, verify implementation";
pub const FOCUS_ALLERGENS: &str =
    "Allergen documentation - previously absent, check compliance with Regulation (EU) 1169/2011";
pub const FOCUS_ENFORCEMENT_HEADER: &str = "Verify compliance with previous enforcement actions:";
pub const FOCUS_HYGIENIC: &str =
    "Hygienic food handling - previously scored poorly, re-assess thoroughly";
pub const FOCUS_STRUCTURE: &str =
    "Structure and cleaning - previously scored poorly, check structural improvements";
pub const FOCUS_MANAGEMENT: &str =
    "Food safety management - previously scored poorly, review documentation";

/// Placeholder for an action without a recorded date.
const UNKNOWN_ACTION_DATE: &str = "date unknown";

const HYGIENIC_CRITERIA: &[&str] = &[
    "temp_cooking",
    "temp_chilled",
    "temp_hot",
    "cross_contamination",
    "personal_hygiene",
    "food_storage",
];

const STRUCTURE_CRITERIA: &[&str] = &[
    "cleanliness_structure",
    "cleanliness_equipment",
    "condition_structure",
    "condition_equipment",
    "pest_control",
    "hand_washing",
    "ventilation_lighting",
    "waste_disposal",
];

const MANAGEMENT_CRITERIA: &[&str] = &[
    "haccp",
    "temperature_records",
    "training_records",
    "traceability",
    "allergens",
    "cleaning_schedules",
];

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Caller-supplied values copied onto the sheet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitSheetOptions {
    /// Overrides the computed classification unconditionally.
    pub inspection_type: Option<InspectionType>,
    pub inspection_date: Option<NaiveDate>,
    pub inspection_time: Option<String>,
    pub inspector_name: Option<String>,
    pub inspector_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Sheet structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitSheet {
    pub header: SheetHeader,
    pub inspection_details: InspectionDetails,
    pub business_details: BusinessDetails,
    pub previous_inspection_summary: PreviousInspectionSummary,
    pub inspection_focus_areas: Vec<String>,
    pub hygienic_food_handling: AssessmentSection,
    pub structure_and_cleaning: AssessmentSection,
    pub management_of_food_safety: AssessmentSection,
    pub temperature_readings: Vec<TemperatureReading>,
    pub overall_rating: OverallRating,
    pub actions_required: ActionsRequired,
    pub declaration: Declaration,
    pub metadata: SheetMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetHeader {
    pub council: CouncilDetails,
    pub form_title: String,
    pub generated_at: Timestamp,
    pub inspection_type: InspectionType,
    pub inspection_type_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionDetails {
    /// Assigned once the visit is booked as an inspection record.
    pub reference_number: Option<String>,
    pub inspection_date: Option<NaiveDate>,
    pub inspection_time: Option<String>,
    pub inspection_type: InspectionType,
    pub inspector_name: Option<String>,
    pub inspector_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessDetails {
    pub premises_ref: String,
    pub uprn: Option<String>,
    pub business_name: String,
    pub trading_name: Option<String>,
    pub business_address: String,
    pub postcode: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub food_business_operator: Option<String>,
    pub business_type: Option<String>,
    pub business_type_detail: Option<String>,
    pub number_of_food_handlers: Option<i32>,
    pub registration_date: Option<NaiveDate>,
    pub trading_hours: Option<String>,
    pub water_supply: Option<String>,
    pub approval_status: String,
    pub primary_authority: Option<String>,
}

/// Sub-scores from the last inspection. Missing scores count as zero in
/// the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastScores {
    pub hygienic_food_handling: Option<i32>,
    pub structure_and_cleaning: Option<i32>,
    pub management_of_food_safety: Option<i32>,
    pub total: i32,
}

/// An enforcement action as listed on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionHistoryEntry {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub action_type: String,
    pub detail: String,
}

impl From<&EnforcementAction> for ActionHistoryEntry {
    fn from(action: &EnforcementAction) -> Self {
        Self {
            date: action.action_date,
            action_type: action.action_type.clone(),
            detail: action.detail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviousInspectionSummary {
    pub last_inspection_date: Option<NaiveDate>,
    /// Only present when the premises has been inspected before.
    pub last_scores: Option<LastScores>,
    pub current_fhrs_rating: Option<i32>,
    pub risk_category: Option<RiskCategory>,
    pub interval_description: String,
    pub previous_actions: Vec<ActionHistoryEntry>,
    pub haccp_in_place: bool,
    pub allergen_documentation: bool,
    pub officer_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentCriterion {
    pub criterion: String,
    pub result: Option<String>,
}

/// A blank scoring section with its criteria in form order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentSection {
    pub score: Option<i32>,
    pub criteria: Vec<AssessmentCriterion>,
    pub comments: String,
}

impl AssessmentSection {
    fn blank(criteria: &[&str]) -> Self {
        Self {
            score: None,
            criteria: criteria
                .iter()
                .map(|c| AssessmentCriterion {
                    criterion: (*c).to_string(),
                    result: None,
                })
                .collect(),
            comments: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemperatureReading {
    pub item: String,
    pub temperature: Option<String>,
    pub required_range: String,
    pub compliant: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverallRating {
    pub total_score: Option<i32>,
    pub fhrs_rating: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionsRequired {
    pub enforcement_actions: Vec<String>,
    pub detailed_actions: String,
    pub revisit_required: bool,
    pub revisit_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub additional_notes: String,
    pub inspector_signature: Option<String>,
    pub business_rep_signature: Option<String>,
    pub business_rep_name: String,
    pub business_rep_role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetMetadata {
    pub business_type_focus: BusinessTypeProfile,
    pub risk_category: Option<RiskCategory>,
    pub is_new_business: bool,
    pub has_outstanding_actions: bool,
    pub previous_inspection_count: usize,
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// Classify the visit. A never-inspected premises is a new business even if
/// it has formal notices against it; an explicit override always wins.
pub fn classify_inspection_type(
    premises: &Premises,
    actions: &[EnforcementAction],
    override_type: Option<InspectionType>,
) -> InspectionType {
    if let Some(explicit) = override_type {
        return explicit;
    }
    if premises.is_new_business() {
        InspectionType::NewBusiness
    } else if requires_revisit(actions) {
        InspectionType::Followup
    } else {
        InspectionType::Routine
    }
}

fn action_focus_line(action: &EnforcementAction) -> String {
    let date = action
        .action_date
        .map_or_else(|| UNKNOWN_ACTION_DATE.to_string(), |d| d.to_string());
    format!("  - {} ({}): {}", action.action_type, date, action.detail)
}

/// Ordered list of areas the officer should concentrate on.
pub fn build_focus_areas(
    premises: &Premises,
    actions: &[EnforcementAction],
    profile: &BusinessTypeProfile,
) -> Vec<String> {
    let mut areas = Vec::new();

    if !premises.haccp_in_place {
        areas.push(FOCUS_HACCP.to_string());
    }
    if !premises.allergen_documentation {
        areas.push(FOCUS_ALLERGENS.to_string());
    }
    if !actions.is_empty() {
        areas.push(FOCUS_ENFORCEMENT_HEADER.to_string());
        areas.extend(actions.iter().map(action_focus_line));
    }
    if premises.last_hygienic_score.unwrap_or(0) >= HYGIENIC_CONCERN_THRESHOLD {
        areas.push(FOCUS_HYGIENIC.to_string());
    }
    if premises.last_structure_score.unwrap_or(0) >= STRUCTURE_CONCERN_THRESHOLD {
        areas.push(FOCUS_STRUCTURE.to_string());
    }
    if premises.last_management_score.unwrap_or(0) >= MANAGEMENT_CONCERN_THRESHOLD {
        areas.push(FOCUS_MANAGEMENT.to_string());
    }

    areas.extend(
        profile
            .key_risks
            .iter()
            .map(|risk| format!("[{}] {}", profile.label, risk)),
    );
    areas
}

/// One blank reading per temperature check in the profile.
pub fn build_temperature_readings(profile: &BusinessTypeProfile) -> Vec<TemperatureReading> {
    profile
        .temperature_checks
        .iter()
        .map(|check| TemperatureReading {
            item: check.item.clone(),
            temperature: None,
            required_range: check.required_range.clone(),
            compliant: None,
        })
        .collect()
}

/// Address lines, town and county joined by newlines, skipping blanks.
pub fn format_business_address(premises: &Premises) -> String {
    [
        &premises.address_line1,
        &premises.address_line2,
        &premises.town,
        &premises.county,
    ]
    .into_iter()
    .filter_map(|line| line.as_deref().map(str::trim))
    .filter(|line| !line.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}

fn last_scores(premises: &Premises) -> Option<LastScores> {
    premises.last_inspection_date.map(|_| LastScores {
        hygienic_food_handling: premises.last_hygienic_score,
        structure_and_cleaning: premises.last_structure_score,
        management_of_food_safety: premises.last_management_score,
        total: premises.last_hygienic_score.unwrap_or(0)
            + premises.last_structure_score.unwrap_or(0)
            + premises.last_management_score.unwrap_or(0),
    })
}

fn business_details(premises: &Premises) -> BusinessDetails {
    BusinessDetails {
        premises_ref: premises.premises_ref.clone(),
        uprn: premises.uprn.clone(),
        business_name: premises.business_name.clone(),
        trading_name: premises.trading_name.clone(),
        business_address: format_business_address(premises),
        postcode: premises.postcode.clone(),
        telephone: premises.telephone.clone(),
        email: premises.email.clone(),
        food_business_operator: premises.food_business_operator.clone(),
        business_type: premises.business_type.clone(),
        business_type_detail: premises.business_type_detail.clone(),
        number_of_food_handlers: premises.number_of_food_handlers,
        registration_date: premises.registration_date,
        trading_hours: premises.trading_hours.clone(),
        water_supply: premises.water_supply.clone(),
        approval_status: premises.approval_status.clone(),
        primary_authority: premises.primary_authority.clone(),
    }
}

/// Assemble a visit sheet from already-fetched records.
pub fn build_visit_sheet(
    premises: &Premises,
    actions: &[EnforcementAction],
    previous_inspection_count: usize,
    catalog: &InspectionCatalog,
    options: &VisitSheetOptions,
    now: Timestamp,
) -> VisitSheet {
    let profile = catalog.profile(premises.business_type.as_deref());
    let interval = catalog.interval(premises.risk_category);
    let inspection_type = classify_inspection_type(premises, actions, options.inspection_type);

    VisitSheet {
        header: SheetHeader {
            council: catalog.council().clone(),
            form_title: FORM_TITLE.to_string(),
            generated_at: now,
            inspection_type,
            inspection_type_label: inspection_type.label().to_string(),
        },
        inspection_details: InspectionDetails {
            reference_number: None,
            inspection_date: options.inspection_date,
            inspection_time: options.inspection_time.clone(),
            inspection_type,
            inspector_name: options.inspector_name.clone(),
            inspector_id: options.inspector_id.clone(),
        },
        business_details: business_details(premises),
        previous_inspection_summary: PreviousInspectionSummary {
            last_inspection_date: premises.last_inspection_date,
            last_scores: last_scores(premises),
            current_fhrs_rating: premises.current_fhrs_rating,
            risk_category: premises.risk_category,
            interval_description: interval.description,
            previous_actions: actions.iter().map(ActionHistoryEntry::from).collect(),
            haccp_in_place: premises.haccp_in_place,
            allergen_documentation: premises.allergen_documentation,
            officer_notes: premises.notes.clone(),
        },
        inspection_focus_areas: build_focus_areas(premises, actions, profile),
        hygienic_food_handling: AssessmentSection::blank(HYGIENIC_CRITERIA),
        structure_and_cleaning: AssessmentSection::blank(STRUCTURE_CRITERIA),
        management_of_food_safety: AssessmentSection::blank(MANAGEMENT_CRITERIA),
        temperature_readings: build_temperature_readings(profile),
        overall_rating: OverallRating::default(),
        actions_required: ActionsRequired::default(),
        declaration: Declaration::default(),
        metadata: SheetMetadata {
            business_type_focus: profile.clone(),
            risk_category: premises.risk_category,
            is_new_business: premises.is_new_business(),
            has_outstanding_actions: !actions.is_empty(),
            previous_inspection_count,
        },
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Generates visit sheets from the data store.
#[derive(Clone)]
pub struct VisitSheetGenerator {
    store: Arc<dyn DataStore>,
    catalog: Arc<InspectionCatalog>,
}

impl VisitSheetGenerator {
    pub fn new(store: Arc<dyn DataStore>, catalog: Arc<InspectionCatalog>) -> Self {
        Self { store, catalog }
    }

    async fn generate_for(
        &self,
        premises: &Premises,
        options: &VisitSheetOptions,
        now: Timestamp,
    ) -> Result<VisitSheet, CoreError> {
        let (actions, inspections) = futures::try_join!(
            self.store.get_previous_actions(&premises.premises_ref),
            self.store.get_inspections_for_premises(&premises.premises_ref),
        )?;

        let sheet = build_visit_sheet(
            premises,
            &actions,
            inspections.len(),
            &self.catalog,
            options,
            now,
        );

        tracing::debug!(
            premises_ref = %premises.premises_ref,
            inspection_type = sheet.header.inspection_type.as_str(),
            focus_areas = sheet.inspection_focus_areas.len(),
            "Generated visit sheet"
        );
        Ok(sheet)
    }

    /// Visit sheet for one premises. `NotFound` if the reference is unknown.
    pub async fn generate(
        &self,
        premises_ref: &str,
        options: &VisitSheetOptions,
        now: Timestamp,
    ) -> Result<VisitSheet, CoreError> {
        let premises = self
            .store
            .get_premises(premises_ref)
            .await?
            .ok_or_else(|| CoreError::premises_not_found(premises_ref))?;

        self.generate_for(&premises, options, now).await
    }

    /// Visit sheets for every premises in the due window, in due-query
    /// order. The first failure aborts the whole batch.
    pub async fn generate_batch(
        &self,
        within_months: u32,
        options: &VisitSheetOptions,
        now: Timestamp,
    ) -> Result<Vec<VisitSheet>, CoreError> {
        validate_within_months(within_months)?;

        let due = self
            .store
            .get_premises_due_inspection(within_months, now)
            .await?;

        let sheets = try_join_all(due.iter().map(|p| self.generate_for(p, options, now))).await?;

        tracing::info!(within_months, count = sheets.len(), "Generated visit sheet batch");
        Ok(sheets)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspection::NewInspection;
    use crate::premises::{ACTION_HYGIENE_IMPROVEMENT, ACTION_WRITTEN_WARNING};
    use crate::store::memory::MemoryDataStore;
    use crate::store::testing::FailingHistoryStore;
    use crate::store::RecordStore;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn now() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    /// Inspected, compliant, no history.
    fn compliant(reference: &str) -> Premises {
        let mut p = Premises::new(reference, "Riverside Cafe");
        p.business_type = Some("takeaway".to_string());
        p.risk_category = Some(RiskCategory::B);
        p.last_inspection_date = date(2023, 4, 1);
        p.last_hygienic_score = Some(5);
        p.last_structure_score = Some(5);
        p.last_management_score = Some(5);
        p.next_inspection_due = date(2024, 4, 1);
        p.haccp_in_place = true;
        p.allergen_documentation = true;
        p
    }

    fn hin() -> EnforcementAction {
        EnforcementAction::new(date(2023, 5, 2), ACTION_HYGIENE_IMPROVEMENT, "Deep clean kitchen")
    }

    // -- Classification --

    #[test]
    fn classification_rules() {
        let inspected = compliant("P1");
        assert_eq!(classify_inspection_type(&inspected, &[], None), InspectionType::Routine);
        assert_eq!(
            classify_inspection_type(&inspected, &[hin()], None),
            InspectionType::Followup
        );

        let warning = EnforcementAction::new(None, ACTION_WRITTEN_WARNING, "");
        assert_eq!(
            classify_inspection_type(&inspected, &[warning], None),
            InspectionType::Routine
        );
    }

    #[test]
    fn new_business_takes_precedence_over_followup() {
        let mut p = compliant("P1");
        p.last_inspection_date = None;
        assert_eq!(classify_inspection_type(&p, &[hin()], None), InspectionType::NewBusiness);
        assert_eq!(
            classify_inspection_type(&p, &[hin()], Some(InspectionType::Complaint)),
            InspectionType::Complaint
        );
    }

    // -- Focus areas --

    #[test]
    fn compliant_premises_only_gets_profile_risks() {
        let catalog = InspectionCatalog::standard();
        let profile = catalog.profile(Some("takeaway"));
        let areas = build_focus_areas(&compliant("P1"), &[], profile);
        assert_eq!(areas.len(), profile.key_risks.len());
        assert_eq!(
            areas[0],
            "[Takeaway/Fast Food] Temperature abuse during holding and delivery"
        );
    }

    #[test]
    fn focus_areas_follow_fixed_order() {
        let catalog = InspectionCatalog::standard();
        let profile = catalog.profile(Some("pub"));

        let mut p = compliant("P1");
        p.haccp_in_place = false;
        p.allergen_documentation = false;
        p.last_hygienic_score = Some(15);
        p.last_structure_score = Some(14);
        p.last_management_score = Some(20);
        let actions = vec![
            hin(),
            EnforcementAction::new(None, ACTION_WRITTEN_WARNING, "Training"),
        ];

        let areas = build_focus_areas(&p, &actions, profile);
        assert_eq!(&areas[0], FOCUS_HACCP);
        assert_eq!(&areas[1], FOCUS_ALLERGENS);
        assert_eq!(&areas[2], FOCUS_ENFORCEMENT_HEADER);
        assert_eq!(
            areas[3],
            "  - Hygiene Improvement Notice (2023-05-02): Deep clean kitchen"
        );
        assert_eq!(areas[4], "  - Written Warning (date unknown): Training");
        assert_eq!(&areas[5], FOCUS_HYGIENIC);
        assert_eq!(&areas[6], FOCUS_MANAGEMENT);
        assert!(areas[7].starts_with("[Pub/Bar] "));
        assert_eq!(areas.len(), 7 + profile.key_risks.len());
    }

    // -- Profile fallback --

    #[test]
    fn unknown_business_type_uses_restaurant_profile() {
        let catalog = InspectionCatalog::standard();
        let mut p = compliant("P1");
        p.business_type = Some("spaceport".to_string());

        let sheet = build_visit_sheet(&p, &[], 0, &catalog, &VisitSheetOptions::default(), now());
        let restaurant = catalog.default_profile();

        assert_eq!(sheet.metadata.business_type_focus, *restaurant);
        let readings: Vec<_> = sheet
            .temperature_readings
            .iter()
            .map(|r| (r.item.as_str(), r.required_range.as_str()))
            .collect();
        let expected: Vec<_> = restaurant
            .temperature_checks
            .iter()
            .map(|c| (c.item.as_str(), c.required_range.as_str()))
            .collect();
        assert_eq!(readings, expected);
        assert!(sheet.temperature_readings.iter().all(|r| r.temperature.is_none()));
        assert!(sheet
            .inspection_focus_areas
            .iter()
            .any(|a| a.starts_with("[Restaurant/Cafe] ")));
    }

    // -- Assembly --

    #[test]
    fn address_skips_blank_lines() {
        let mut p = compliant("P1");
        p.address_line1 = Some("1 High Street".to_string());
        p.address_line2 = Some("  ".to_string());
        p.town = Some("Gloucester".to_string());
        assert_eq!(format_business_address(&p), "1 High Street\nGloucester");
    }

    #[test]
    fn sheet_projects_premises_and_options() {
        let catalog = InspectionCatalog::standard();
        let options = VisitSheetOptions {
            inspection_date: date(2024, 3, 5),
            inspector_name: Some("A. Officer".to_string()),
            ..Default::default()
        };
        let sheet = build_visit_sheet(&compliant("P1"), &[hin()], 2, &catalog, &options, now());

        assert_eq!(sheet.header.form_title, FORM_TITLE);
        assert_eq!(sheet.header.inspection_type, InspectionType::Followup);
        assert_eq!(sheet.header.inspection_type_label, "Follow-up Inspection");
        assert_eq!(sheet.header.council.name, "Gloucester City Council");
        assert_eq!(sheet.inspection_details.inspection_date, date(2024, 3, 5));
        assert_eq!(sheet.inspection_details.reference_number, None);
        assert_eq!(
            sheet.previous_inspection_summary.interval_description,
            "Upper medium risk - at least every 12 months"
        );
        assert_eq!(sheet.previous_inspection_summary.last_scores.unwrap().total, 15);
        assert_eq!(sheet.hygienic_food_handling.criteria.len(), 6);
        assert_eq!(sheet.structure_and_cleaning.criteria.len(), 8);
        assert_eq!(sheet.management_of_food_safety.criteria[0].criterion, "haccp");
        assert!(sheet.metadata.has_outstanding_actions);
        assert!(!sheet.metadata.is_new_business);
        assert_eq!(sheet.metadata.previous_inspection_count, 2);
    }

    #[test]
    fn never_inspected_has_no_last_scores() {
        let mut p = compliant("P1");
        p.last_inspection_date = None;
        p.risk_category = None;
        let sheet = build_visit_sheet(
            &p,
            &[],
            0,
            &InspectionCatalog::standard(),
            &VisitSheetOptions::default(),
            now(),
        );
        assert_eq!(sheet.previous_inspection_summary.last_scores, None);
        assert_eq!(sheet.previous_inspection_summary.interval_description, "Unknown");
        assert_eq!(sheet.header.inspection_type, InspectionType::NewBusiness);
    }

    // -- Service --

    async fn generator() -> (Arc<MemoryDataStore>, VisitSheetGenerator) {
        let store = Arc::new(
            MemoryDataStore::with_premises([
                (compliant("P1"), vec![hin()]),
                (compliant("P2"), vec![]),
            ])
            .await,
        );
        let generator = VisitSheetGenerator::new(store.clone(), Arc::new(InspectionCatalog::standard()));
        (store, generator)
    }

    #[tokio::test]
    async fn generate_counts_previous_inspections() {
        let (store, generator) = generator().await;
        store
            .create_inspection(
                NewInspection {
                    premises_ref: "P1".to_string(),
                    inspection_date: None,
                    inspection_time: None,
                    inspection_type: InspectionType::Routine,
                    inspector_name: None,
                    inspector_id: None,
                },
                now(),
            )
            .await
            .unwrap();

        let sheet = generator
            .generate("P1", &VisitSheetOptions::default(), now())
            .await
            .unwrap();
        assert_eq!(sheet.business_details.premises_ref, "P1");
        assert_eq!(sheet.metadata.previous_inspection_count, 1);
        let history = &sheet.previous_inspection_summary.previous_actions;
        assert_eq!(history, &vec![ActionHistoryEntry::from(&hin())]);

        let json = serde_json::to_value(&history[0]).unwrap();
        assert_eq!(json["type"], ACTION_HYGIENE_IMPROVEMENT);
        assert_eq!(json["date"], "2023-05-02");
        assert!(json.get("action_type").is_none());
    }

    #[tokio::test]
    async fn generate_unknown_premises_is_not_found() {
        let (_, generator) = generator().await;
        let result = generator
            .generate("MISSING", &VisitSheetOptions::default(), now())
            .await;
        assert_matches!(
            result,
            Err(CoreError::NotFound { reference, .. }) if reference == "MISSING"
        );
    }

    #[tokio::test]
    async fn batch_follows_due_query_order() {
        let (_, generator) = generator().await;
        let sheets = generator
            .generate_batch(6, &VisitSheetOptions::default(), now())
            .await
            .unwrap();
        let refs: Vec<_> = sheets
            .iter()
            .map(|s| s.business_details.premises_ref.as_str())
            .collect();
        assert_eq!(refs, ["P1", "P2"]);
    }

    #[tokio::test]
    async fn batch_aborts_when_one_premises_fails() {
        let inner = MemoryDataStore::with_premises([
            (compliant("P1"), vec![hin()]),
            (compliant("P2"), vec![]),
        ])
        .await;
        let store = Arc::new(FailingHistoryStore::new(inner, "P2"));
        let generator = VisitSheetGenerator::new(store, Arc::new(InspectionCatalog::standard()));

        let result = generator
            .generate_batch(6, &VisitSheetOptions::default(), now())
            .await;
        assert_matches!(
            result,
            Err(CoreError::DataStoreUnavailable(msg)) if msg.contains("P2")
        );

        // The unaffected premises still generates on its own.
        assert!(generator
            .generate("P1", &VisitSheetOptions::default(), now())
            .await
            .is_ok());
    }
}
