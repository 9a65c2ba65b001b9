//! Synthetic request generator that keeps the instruments busy.

pub mod simulator;

pub use simulator::{WorkloadSimulator, STATUS_OK};
