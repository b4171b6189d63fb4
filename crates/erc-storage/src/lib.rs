//! Storage for the ERC ingestion pipeline.
//!
//! A [`StorageRegistry`] owns one SQLite connection per alias. The
//! [`upload`] gateway writes a transformed table into its destination in a
//! single transaction, skipping rows that already exist unless
//! [`WriteMode::Append`] is requested.

pub mod descriptor;
pub mod gateway;
pub mod registry;
pub mod schema;
pub mod value;

pub use descriptor::{ConnectionDescriptor, ConnectionTarget, DEFAULT_BUSY_TIMEOUT};
pub use gateway::{WriteMode, classify_sqlite_error, quote_identifier, upload};
pub use registry::{StorageHandle, StorageRegistry};
pub use schema::{DESTINATION_TABLES, DestinationTable, destination_table, ensure_destination_tables};
pub use value::to_sql_value;
