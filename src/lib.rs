pub mod actions;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod git;
pub mod metadata;
pub mod registry;
pub mod resolver;
pub mod ui;

pub use error::{PublishError, Result};
