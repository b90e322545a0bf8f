//! Command-line plumbing shared by the binary and its tests

pub mod orchestration;
pub mod setup;
