pub mod jobseeker_service;

pub use jobseeker_service::{JobseekerService, ListError, ListPage, ListQuery};
