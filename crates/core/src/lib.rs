#![forbid(unsafe_code)]

pub mod catalog;
pub mod intake;
pub mod model;
pub mod time;

pub use catalog::{CatalogError, StampCatalog, StampDefinition, STANDARD_STAMP_NAMES};
pub use time::Clock;
