#![forbid(unsafe_code)]

pub mod address_bar;
pub mod app_services;
pub mod error;
pub mod intake_service;
pub mod motivation;
pub mod progress_service;

pub use stamp_core::Clock;

pub use address_bar::{AddressBar, MemoryAddressBar};
pub use app_services::AppServices;
pub use error::{AppServicesError, MotivationError};
pub use intake_service::{IgnoreReason, IntakeOutcome, IntakeReport, IntakeService};
pub use motivation::{
    HttpMotivationSource, MotivationConfig, MotivationFetcher, MotivationSource,
};
pub use progress_service::ProgressService;
