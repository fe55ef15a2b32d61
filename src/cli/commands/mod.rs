pub mod auth;
pub mod jobseekers;
