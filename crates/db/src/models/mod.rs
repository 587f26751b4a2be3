pub mod enforcement_action;
pub mod inspection;
pub mod premises;
