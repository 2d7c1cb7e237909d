pub mod availability;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod services;

pub use availability::{AvailabilityEvaluator, Evaluation, ResolvedLocation};
pub use error::TerminalError;
pub use models::{Availability, Coordinates, TerminalId, TerminalRecord, WorkingHoursEntry};
