pub mod manager;
pub mod query_builder;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{JobseekerRepository, JOBSEEKER_TABLE};
