//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use hygiene_core::inspection::InspectionType;
use hygiene_core::visit_sheet::VisitSheetOptions;
use serde::Deserialize;

use crate::error::AppResult;

/// Look-ahead window (`?months=`). Falls back to the configured default;
/// range checks happen in the scheduler.
#[derive(Debug, Default, Deserialize)]
pub struct WithinMonthsParams {
    pub months: Option<u32>,
}

impl WithinMonthsParams {
    pub fn resolve(&self, default: u32) -> u32 {
        self.months.unwrap_or(default)
    }
}

/// Visit-sheet options plus an optional window for batch generation.
#[derive(Debug, Default, Deserialize)]
pub struct VisitSheetParams {
    pub months: Option<u32>,
    pub inspection_type: Option<String>,
    pub inspection_date: Option<NaiveDate>,
    pub inspection_time: Option<String>,
    pub inspector_name: Option<String>,
    pub inspector_id: Option<String>,
}

impl VisitSheetParams {
    /// Convert into generator options, rejecting unknown inspection types.
    pub fn to_options(&self) -> AppResult<VisitSheetOptions> {
        let inspection_type = self
            .inspection_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(InspectionType::from_str_value)
            .transpose()?;

        Ok(VisitSheetOptions {
            inspection_type,
            inspection_date: self.inspection_date,
            inspection_time: self.inspection_time.clone(),
            inspector_name: self.inspector_name.clone(),
            inspector_id: self.inspector_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use assert_matches::assert_matches;
    use hygiene_core::error::CoreError;

    #[test]
    fn months_defaults_when_absent() {
        assert_eq!(WithinMonthsParams::default().resolve(6), 6);
        assert_eq!(WithinMonthsParams { months: Some(3) }.resolve(6), 3);
    }

    #[test]
    fn inspection_type_override_is_parsed() {
        let params = VisitSheetParams {
            inspection_type: Some("complaint".to_string()),
            ..Default::default()
        };
        let options = params.to_options().unwrap();
        assert_eq!(options.inspection_type, Some(InspectionType::Complaint));
    }

    #[test]
    fn unknown_inspection_type_is_rejected() {
        let params = VisitSheetParams {
            inspection_type: Some("audit".to_string()),
            ..Default::default()
        };
        assert_matches!(
            params.to_options(),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
