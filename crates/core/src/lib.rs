//! Food hygiene inspection domain logic.
//!
//! This crate has no database or HTTP dependencies. The scheduler and the
//! visit-sheet generator read through the [`store::DataStore`] trait, which
//! the `db` crate implements over PostgreSQL and [`store::memory`] implements
//! in memory.

pub mod catalog;
pub mod error;
pub mod fhrs;
pub mod inspection;
pub mod premises;
pub mod scheduling;
pub mod store;
pub mod sync;
pub mod types;
pub mod visit_sheet;
