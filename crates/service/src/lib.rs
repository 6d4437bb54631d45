//! Service layer for the record store.
//! - `records`: the schema-less record type and the `RecordStore` seam handlers use.
//! - `file`: the file-backed implementation.
//! - `storage`: reusable JSON persistence helpers.

pub mod errors;
pub mod records;
pub mod storage;
pub mod file;

pub use file::record_store::FileRecordStore;
pub use records::{store::RecordStore, Record};
