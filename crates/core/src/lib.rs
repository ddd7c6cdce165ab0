//! `quotemerge-core`: shared data model for the consolidate/split pipeline.
//!
//! Pure types: no file I/O, no logging. Both pipeline stages receive the
//! canonical [`Schema`] explicitly instead of reading a global constant.

pub mod cell;
pub mod error;
pub mod record;
pub mod schema;
pub mod table;

pub use cell::CellValue;
pub use error::CoreError;
pub use record::Record;
pub use schema::{FieldId, Schema};
pub use table::Table;
