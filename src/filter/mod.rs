pub mod criteria;
pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod sanitize;
pub mod types;

pub use criteria::{build_filters, FilterCriteria, FilterKey};
pub use error::FilterError;
pub use filter::Filter;
pub use filter_order::{FilterOrder, SORTABLE_COLUMNS};
pub use types::*;
