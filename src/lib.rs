//! Simulated Oxford Nanopore reads drawn from empirical error profiles.

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod sim;

pub use config::{AddressingMode, Chemistry, ClassWeights, ProfileSource, SimConfig};
pub use error::{Result, SimError};
