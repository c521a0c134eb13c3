//! modelhub - local artifact cache and remote archive sync
//!
//! Materializes named models, datasets and source repositories from a
//! registry into a local cache, and mirrors local directories to a
//! directory-oriented remote archive.

pub mod archive;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod remote;
pub mod staging;
pub mod ui;

pub use error::{HubError, HubResult};
