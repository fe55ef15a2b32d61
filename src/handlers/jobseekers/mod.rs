pub mod export;
pub mod list;

pub use export::jobseekers_export;
pub use list::jobseekers_list;
