//! Food Hygiene Rating Scheme thresholds.
//!
//! A lower total inspection score is better. The total is the sum of the
//! hygienic handling, structure and management scores.

/// Upper bound (inclusive) of the total score for each rating, best first.
pub const FHRS_THRESHOLDS: &[(i32, i32, &str)] = &[
    (15, 5, "Very Good"),
    (20, 4, "Good"),
    (30, 3, "Generally Satisfactory"),
    (40, 2, "Improvement Necessary"),
    (50, 1, "Major Improvement Necessary"),
];

/// Rating when the total exceeds every threshold.
pub const LOWEST_RATING: i32 = 0;

/// Label for premises that have no published rating.
pub const NOT_YET_RATED: &str = "Not Yet Rated";

/// Map a total inspection score to its 0–5 rating.
pub fn rating_for_total_score(total: i32) -> i32 {
    FHRS_THRESHOLDS
        .iter()
        .find(|(max, _, _)| total <= *max)
        .map(|(_, rating, _)| *rating)
        .unwrap_or(LOWEST_RATING)
}

/// Human-readable label for a rating.
pub fn rating_label(rating: Option<i32>) -> &'static str {
    match rating {
        Some(5) => "Very Good",
        Some(4) => "Good",
        Some(3) => "Generally Satisfactory",
        Some(2) => "Improvement Necessary",
        Some(1) => "Major Improvement Necessary",
        Some(0) => "Urgent Improvement Required",
        _ => NOT_YET_RATED,
    }
}
