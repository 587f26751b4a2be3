pub mod inspections;
pub mod premises;
pub mod visit_sheets;
