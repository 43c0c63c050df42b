//! Core data structures for the Gatewing simulation.

pub mod observation;
pub mod record;
pub mod view;
