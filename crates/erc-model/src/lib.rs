pub mod error;
pub mod mapping;
pub mod period;
pub mod source;
pub mod upload;

pub use error::{ErcError, ErrorCategory, ErrorResponse, Result};
pub use mapping::{ColumnMapping, ColumnRename};
pub use period::PeriodFlag;
pub use source::DataSource;
pub use upload::{UploadResponse, UploadResult};
