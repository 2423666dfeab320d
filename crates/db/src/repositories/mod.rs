//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod form_structure_repo;
pub mod proposal_repo;
pub mod service_repo;
pub mod user_repo;

pub use form_structure_repo::FormStructureRepo;
pub use proposal_repo::ProposalRepo;
pub use service_repo::ServiceRepo;
pub use user_repo::UserRepo;
