pub mod attendance;
pub mod auth;
pub mod classes;
pub mod feedback;
pub mod marks;
pub mod schools;
pub mod students;
pub mod subject_assignments;
pub mod subjects;
pub mod tasks;
pub mod users;
