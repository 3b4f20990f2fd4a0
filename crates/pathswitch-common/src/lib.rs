//! PathSwitch Common - Shared types for hysteresis-gated path selection
//!
//! This crate provides the value objects every other crate speaks:
//! - Path identifiers and per-path tables
//! - Telemetry readings and weight vectors
//! - Decision parameters and their validation
//! - Configuration profiles and the profile store
//! - Error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod params;
pub mod path;
pub mod profile;
pub mod telemetry;

pub use error::*;
pub use params::{DecisionParameters, WeightVector};
pub use path::{PathId, PathTable};
pub use profile::{
    seed_defaults, InMemoryProfileStore, NewProfile, Profile, ProfileStore, ProfileUpdate,
};
pub use telemetry::Telemetry;
