//! Cross-crate scenarios.

pub mod cycle_flow;
pub mod sequencing;
pub mod supervision;
