//! Composable sentiment pipeline
//!
//! - [`spec`]: JSON configuration
//! - [`validation`]: rule engine over a spec
//! - [`traits`]: stage boundaries
//! - [`runner`]: stage orchestration
//! - [`observer`]: stage-boundary hooks
//! - [`artifacts`]: run output

pub mod artifacts;
pub mod errors;
pub mod observer;
pub mod runner;
pub mod spec;
pub mod traits;
pub mod validation;
