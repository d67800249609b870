#![forbid(unsafe_code)]

//! Core domain model and heat seeding logic for swim meet heat sheets.
//!
//! This crate provides:
//! - Domain types (swimmers, relay teams, genders, relay kinds)
//! - Configuration (meet settings and the event schedule template)
//! - CSV entry ingestion
//! - Heat organization
//! - Event and meet models
//! - PDF heat sheet rendering

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod import;
pub mod heats;
pub mod event;
pub mod meet;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use heats::{heat_sizes, organize};
pub use event::{derive_attributes, Event, EventAttributes};
pub use meet::{Meet, RenderedEvent};
pub use report::{build_heat_sheet, event_file_name, write_heat_sheet};
