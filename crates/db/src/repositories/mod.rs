pub mod enforcement_action_repo;
pub mod inspection_repo;
pub mod premises_repo;

pub use enforcement_action_repo::EnforcementActionRepo;
pub use inspection_repo::InspectionRepo;
pub use premises_repo::PremisesRepo;
