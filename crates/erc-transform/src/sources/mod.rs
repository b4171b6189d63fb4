//! Shipped data-source transformers.

mod bienes;
mod inversion;
mod servicios;
mod turismo;

pub use bienes::BienesTransformer;
pub use inversion::InversionTransformer;
pub use servicios::ServiciosTransformer;
pub use turismo::TurismoTransformer;
