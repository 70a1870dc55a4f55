pub mod controller;
pub mod router;
pub mod service;

pub use router::init_subject_assignments_router;
