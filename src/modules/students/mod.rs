//! Per-student read endpoints. Each record kind keeps its handler in its own
//! module; this router only mounts them under `/api/students/{id}`.

pub mod router;

pub use router::init_students_router;
