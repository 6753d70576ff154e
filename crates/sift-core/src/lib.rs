//! Core types and trait definitions for the sift annotation service.
//!
//! No HTTP or database dependencies; every other crate in the workspace
//! builds on this one.

pub mod annotator;
pub mod candidate;
pub mod error;
pub mod judgment;
pub mod sampler;
pub mod store;

pub use error::{Error, Result};
