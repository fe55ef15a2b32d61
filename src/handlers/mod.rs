// Handlers for the jobseeker API.
//
// Public: banner and health. Protected (JWT): listing and CSV export under /api/jobseekers.
pub mod health;
pub mod jobseekers;
