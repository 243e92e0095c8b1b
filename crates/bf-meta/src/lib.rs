//! Load metadata for Bankflow.
//!
//! Two tables live next to the warehouse data: an append-only audit log of
//! every file load attempt and a per-table marker of the last successful
//! update.

pub mod ddl;
pub mod error;
pub mod last_update;
pub mod load_info;
pub mod timestamp;

pub use ddl::{ensure_meta_tables, LAST_UPDATE_TABLE, LOAD_INFO_TABLE};
pub use error::{MetaError, MetaResult};
pub use last_update::{all_last_updates, last_update, touch_last_update, LastUpdate, UpdateCategory};
pub use load_info::{load_history, record_load, LoadInfoRow, LoadRecord, LoadStatus};
