mod catalog_service;
mod errors;
mod sample_data;

pub use catalog_service::{CatalogService, CatalogStats};
pub use errors::{CatalogError, EntityKind, ErrorKind, Result};
