//! CSV export of jobseeker records.

pub mod columns;
pub mod driver;
pub mod error;
pub mod escape;
pub mod row;
pub mod source;

pub use columns::{Cell, Column, ColumnRegistry, JOBSEEKER_COLUMNS};
pub use driver::{
    export_filename, CsvExport, ExportDriver, ExportSettings, EXPORT_FILENAME_PREFIX, EXPORT_PAGE_SIZE,
    EXPORT_RECORDS_HEADER,
};
pub use error::ExportError;
pub use escape::{escape, escape_str};
pub use row::{join_row, materialize, materialize_into};
pub use source::RecordSource;
