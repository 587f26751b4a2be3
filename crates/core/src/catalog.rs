//! Static inspection catalogs: risk-category intervals, business-type risk
//! profiles and the council header block.
//!
//! Built once at startup via [`InspectionCatalog::standard`] and shared
//! read-only (`Arc<InspectionCatalog>`) by the scheduler and the visit-sheet
//! generator.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Risk categories
// ---------------------------------------------------------------------------

/// Food Law Code of Practice risk category. `A` is the highest risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    A,
    B,
    C,
    D,
    E,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Parse a stored category. Case-insensitive; anything else is unknown.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }

    /// Sort rank used by the due-inspection query. Unknown sorts last (6).
    pub fn rank(category: Option<Self>) -> u8 {
        match category {
            Some(Self::A) => 1,
            Some(Self::B) => 2,
            Some(Self::C) => 3,
            Some(Self::D) => 4,
            Some(Self::E) => 5,
            None => 6,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Inspection intervals
// ---------------------------------------------------------------------------

/// Interval applied when the category is unknown.
pub const UNKNOWN_INTERVAL_MONTHS: u32 = 18;

/// Description applied when the category is unknown.
pub const UNKNOWN_INTERVAL_DESCRIPTION: &str = "Unknown";

/// Minimum inspection frequency for one risk category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskInterval {
    pub months: u32,
    pub description: String,
}

impl RiskInterval {
    fn new(months: u32, description: &str) -> Self {
        Self {
            months,
            description: description.to_string(),
        }
    }

    fn unknown() -> Self {
        Self::new(UNKNOWN_INTERVAL_MONTHS, UNKNOWN_INTERVAL_DESCRIPTION)
    }
}

fn standard_intervals() -> BTreeMap<RiskCategory, RiskInterval> {
    BTreeMap::from([
        (
            RiskCategory::A,
            RiskInterval::new(6, "High risk - at least every 6 months"),
        ),
        (
            RiskCategory::B,
            RiskInterval::new(12, "Upper medium risk - at least every 12 months"),
        ),
        (
            RiskCategory::C,
            RiskInterval::new(18, "Medium risk - at least every 18 months"),
        ),
        (
            RiskCategory::D,
            RiskInterval::new(24, "Lower medium risk - at least every 24 months"),
        ),
        (
            RiskCategory::E,
            RiskInterval::new(
                36,
                "Low risk - alternative enforcement strategy or 3-yearly",
            ),
        ),
    ])
}

// ---------------------------------------------------------------------------
// Business-type profiles
// ---------------------------------------------------------------------------

/// Code of the profile used when a premises' business type is unmatched.
pub const DEFAULT_BUSINESS_TYPE: &str = "restaurant";

/// One temperature check an inspector is expected to take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureCheck {
    pub item: String,
    pub required_range: String,
}

/// Risk focus and temperature checks for one kind of food business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessTypeProfile {
    pub code: String,
    pub label: String,
    pub key_risks: Vec<String>,
    pub temperature_checks: Vec<TemperatureCheck>,
}

struct ProfileSeed {
    code: &'static str,
    label: &'static str,
    key_risks: &'static [&'static str],
    temperature_checks: &'static [(&'static str, &'static str)],
}

impl From<&ProfileSeed> for BusinessTypeProfile {
    fn from(seed: &ProfileSeed) -> Self {
        Self {
            code: seed.code.to_string(),
            label: seed.label.to_string(),
            key_risks: seed.key_risks.iter().map(|r| r.to_string()).collect(),
            temperature_checks: seed
                .temperature_checks
                .iter()
                .map(|(item, range)| TemperatureCheck {
                    item: item.to_string(),
                    required_range: range.to_string(),
                })
                .collect(),
        }
    }
}

const CHILLED: &str = "0-5\u{b0}C";
const CHILLED_DISPLAY: &str = "0-8\u{b0}C";
const FROZEN: &str = "-18\u{b0}C or below";
const HOT_HOLDING: &str = "63\u{b0}C or above";
const CORE_COOKED: &str = "75\u{b0}C or above";
const AMBIENT: &str = "Below 25\u{b0}C";

const PROFILE_SEEDS: &[ProfileSeed] = &[
    ProfileSeed {
        code: "restaurant",
        label: "Restaurant/Cafe",
        key_risks: &[
            "Cross-contamination between raw and ready-to-eat foods",
            "Allergen management across complex menus",
            "Temperature control during multi-stage cooking",
            "Staff hand-washing compliance during service",
            "Cleaning of food contact surfaces between uses",
        ],
        temperature_checks: &[
            ("Walk-in chiller", CHILLED),
            ("Walk-in freezer", FROZEN),
            ("Hot holding display", HOT_HOLDING),
            ("Cooked food (core temp)", CORE_COOKED),
            ("Dessert fridge", CHILLED),
        ],
    },
    ProfileSeed {
        code: "takeaway",
        label: "Takeaway/Fast Food",
        key_risks: &[
            "Temperature abuse during holding and delivery",
            "Cross-contamination in limited preparation space",
            "Oil quality in deep fat fryers",
            "Personal hygiene with high staff turnover",
            "Allergen information at point of sale",
        ],
        temperature_checks: &[
            ("Main fridge", CHILLED),
            ("Freezer", FROZEN),
            ("Hot holding cabinet", HOT_HOLDING),
            ("Cooked food (core temp)", CORE_COOKED),
            ("Frying oil temperature", "175-185\u{b0}C"),
        ],
    },
    ProfileSeed {
        code: "pub",
        label: "Pub/Bar",
        key_risks: &[
            "Food storage in cramped cellar/kitchen areas",
            "Temperature control of bar snacks and buffets",
            "Cleaning of draught beer lines and dispense equipment",
            "Separation of food and drink preparation",
            "Staff food hygiene training (mixed food/drink roles)",
        ],
        temperature_checks: &[
            ("Kitchen fridge", CHILLED),
            ("Kitchen freezer", FROZEN),
            ("Cellar temperature", "10-13\u{b0}C"),
            ("Sunday roast core temp", CORE_COOKED),
            ("Hot holding (carvery)", HOT_HOLDING),
        ],
    },
    ProfileSeed {
        code: "hotel",
        label: "Hotel/B&B",
        key_risks: &[
            "Multiple food service areas (restaurant, room service, bar, conference)",
            "Breakfast buffet temperature control",
            "Allergen management across diverse menus",
            "Extended food preparation hours",
            "Pest control in older building fabric",
        ],
        temperature_checks: &[
            ("Main kitchen chiller", CHILLED),
            ("Main kitchen freezer", FROZEN),
            ("Breakfast buffet (hot)", HOT_HOLDING),
            ("Breakfast buffet (cold)", CHILLED_DISPLAY),
            ("Room service holding", HOT_HOLDING),
        ],
    },
    ProfileSeed {
        code: "retail",
        label: "Retail Shop",
        key_risks: &[
            "Chilled display cabinet temperatures",
            "Date coding and stock rotation",
            "Food returned to storage after display",
            "Pest control (particularly stored products)",
            "Allergen labelling on pre-packed foods",
        ],
        temperature_checks: &[
            ("Display chiller (dairy)", CHILLED),
            ("Display chiller (deli)", CHILLED),
            ("Storage freezer", FROZEN),
            ("Back-of-house chiller", CHILLED),
            ("Ambient store temperature", AMBIENT),
        ],
    },
    ProfileSeed {
        code: "supermarket",
        label: "Supermarket",
        key_risks: &[
            "Cold chain integrity across multiple display units",
            "In-store bakery and deli cross-contamination",
            "Date coding compliance at scale",
            "Pest control across large premises",
            "Staff training across multiple departments",
        ],
        temperature_checks: &[
            ("Dairy display chiller", CHILLED),
            ("Meat display chiller", CHILLED),
            ("Frozen goods display", FROZEN),
            ("Deli counter", CHILLED),
            ("In-store bakery ambient", AMBIENT),
        ],
    },
    ProfileSeed {
        code: "manufacturer",
        label: "Food Manufacturer/Packer",
        key_risks: &[
            "HACCP critical control points at each process step",
            "Allergen segregation and cleaning between product runs",
            "Traceability and recall procedures",
            "Water quality (where used in production)",
            "Packaging integrity and labelling accuracy",
        ],
        temperature_checks: &[
            ("Ingredient chiller", CHILLED),
            ("Blast chiller", "Below 5\u{b0}C within 90 mins"),
            ("Finished product storage", CHILLED),
            ("Production area ambient", AMBIENT),
            ("Freezer storage", FROZEN),
        ],
    },
    ProfileSeed {
        code: "caterer",
        label: "Caterer",
        key_risks: &[
            "Temperature control during transport",
            "Cross-contamination at temporary event sites",
            "Allergen management for large-scale catering",
            "Hand washing facilities at events",
            "Traceability across multiple suppliers",
        ],
        temperature_checks: &[
            ("Base kitchen chiller", CHILLED),
            ("Transport container (hot)", HOT_HOLDING),
            ("Transport container (cold)", CHILLED_DISPLAY),
            ("Reheated food core temp", CORE_COOKED),
            ("Base kitchen freezer", FROZEN),
        ],
    },
    ProfileSeed {
        code: "school",
        label: "School/Hospital/Care",
        key_risks: &[
            "Allergen management for vulnerable populations",
            "Special dietary requirements (medical/religious)",
            "Large-scale cooking and holding temperatures",
            "Cleaning during continuous service",
            "Staff training and supervision",
        ],
        temperature_checks: &[
            ("Walk-in chiller", CHILLED),
            ("Walk-in freezer", FROZEN),
            ("Hot holding trolley", HOT_HOLDING),
            ("Core temp (main dish)", CORE_COOKED),
            ("Salad bar temperature", CHILLED_DISPLAY),
        ],
    },
    ProfileSeed {
        code: "mobile",
        label: "Mobile Food Unit",
        key_risks: &[
            "Limited hand washing facilities",
            "Water supply adequacy and quality",
            "Waste water disposal",
            "Temperature control with limited refrigeration",
            "Structural condition of vehicle/unit",
        ],
        temperature_checks: &[
            ("On-board fridge", CHILLED),
            ("Cooked food core temp", CORE_COOKED),
            ("Hot holding display", HOT_HOLDING),
            ("On-board freezer", FROZEN),
        ],
    },
];

// ---------------------------------------------------------------------------
// Council header
// ---------------------------------------------------------------------------

/// Issuing authority shown in the visit-sheet header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilDetails {
    pub name: String,
    pub department: String,
    pub address: String,
    pub telephone: String,
    pub email: String,
    pub website: String,
}

impl Default for CouncilDetails {
    fn default() -> Self {
        Self {
            name: "Gloucester City Council".to_string(),
            department: "Environmental Health Department".to_string(),
            address: "Shire Hall, Westgate Street, Gloucester, GL1 2TG".to_string(),
            telephone: "01452 396396".to_string(),
            email: "environmentalhealth@gloucester.gov.uk".to_string(),
            website: "www.gloucester.gov.uk".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable lookup tables consumed by scheduling and visit-sheet generation.
#[derive(Debug, Clone)]
pub struct InspectionCatalog {
    intervals: BTreeMap<RiskCategory, RiskInterval>,
    business_types: BTreeMap<String, BusinessTypeProfile>,
    default_business_type: String,
    council: CouncilDetails,
}

impl InspectionCatalog {
    /// Build a catalog from custom tables.
    ///
    /// Fails if `default_business_type` has no matching profile, since every
    /// unmatched premises must resolve to some profile.
    pub fn new(
        intervals: BTreeMap<RiskCategory, RiskInterval>,
        profiles: Vec<BusinessTypeProfile>,
        default_business_type: &str,
        council: CouncilDetails,
    ) -> Result<Self, CoreError> {
        let business_types: BTreeMap<String, BusinessTypeProfile> = profiles
            .into_iter()
            .map(|p| (p.code.clone(), p))
            .collect();

        if !business_types.contains_key(default_business_type) {
            return Err(CoreError::Validation(format!(
                "Default business type '{default_business_type}' has no profile"
            )));
        }

        Ok(Self {
            intervals,
            business_types,
            default_business_type: default_business_type.to_string(),
            council,
        })
    }

    /// The Annex 5 interval table and the ten built-in business profiles.
    pub fn standard() -> Self {
        Self {
            intervals: standard_intervals(),
            business_types: PROFILE_SEEDS
                .iter()
                .map(|seed| (seed.code.to_string(), BusinessTypeProfile::from(seed)))
                .collect(),
            default_business_type: DEFAULT_BUSINESS_TYPE.to_string(),
            council: CouncilDetails::default(),
        }
    }

    /// Replace the council header block.
    pub fn with_council(mut self, council: CouncilDetails) -> Self {
        self.council = council;
        self
    }

    /// Interval for a category, or the 18-month "Unknown" fallback.
    pub fn interval(&self, category: Option<RiskCategory>) -> RiskInterval {
        category
            .and_then(|c| self.intervals.get(&c))
            .cloned()
            .unwrap_or_else(RiskInterval::unknown)
    }

    /// Profile for a business-type code, falling back to the default profile.
    pub fn profile(&self, business_type: Option<&str>) -> &BusinessTypeProfile {
        business_type
            .and_then(|code| self.business_types.get(code))
            .unwrap_or_else(|| self.default_profile())
    }

    pub fn default_profile(&self) -> &BusinessTypeProfile {
        // Presence is checked in `new` and guaranteed by `standard`.
        &self.business_types[&self.default_business_type]
    }

    pub fn profiles(&self) -> impl Iterator<Item = &BusinessTypeProfile> {
        self.business_types.values()
    }

    pub fn council(&self) -> &CouncilDetails {
        &self.council
    }
}

impl Default for InspectionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
