//! Headless generation runner for the gatewing simulation core.

pub mod runner;

pub use runner::{load_config, NetworkPopulation, PopulationSource, Runner};
