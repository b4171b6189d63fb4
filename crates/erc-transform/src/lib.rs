//! Transformation pipeline for ERC indicator tables.
//!
//! A loaded table flows through [`Transformer::transform`]: labels are
//! normalized, headers validated, columns projected and renamed, the renamed
//! schema validated, and finally the source-specific reshape runs. Every
//! failure is an [`erc_model::ErcError`].

pub mod frame_utils;
pub mod mapper;
pub mod normalize;
pub mod registry;
pub mod reshape;
pub mod sources;
pub mod transformer;
pub mod validate;

pub use mapper::map_columns;
pub use normalize::{normalize_columns, normalize_label};
pub use registry::{TransformerRegistry, default_registry};
pub use reshape::{
    FlagEncoding, PeriodPattern, UnpivotColumns, aggregate_sum, partition_columns, unpivot_periods,
};
pub use sources::{BienesTransformer, InversionTransformer, ServiciosTransformer, TurismoTransformer};
pub use transformer::{PeriodColumns, Transformer, TransformerDescriptor, run_transform};
pub use validate::{validate_headers, validate_period_headers, validate_required};
