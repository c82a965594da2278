pub mod error_chain;
pub mod extract;
pub mod mutate;
pub mod schedule;
pub mod simulator;

#[cfg(test)]
pub mod test_utils;

pub use simulator::{run_simulation, OutputOptions, SimulatedRead, Simulator};
