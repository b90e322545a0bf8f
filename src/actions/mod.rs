//! Per-module publish actions
//!
//! The actual upload is external: each configured module names a command
//! that publishes it. Commands run with the resolved version and module
//! identity in their environment:
//! - PUBLISH_GROUP / PUBLISH_NAME: module identity
//! - PUBLISH_VERSION: the resolved version
//! - PUBLISH_TAG: the tag that will record the publish
//! - PUBLISH_MODE: local, release or dev
//! - PUBLISH_URL: project URL, when the remote has one

pub mod context;
pub mod runner;

pub use context::ActionContext;
pub use runner::ActionRunner;
