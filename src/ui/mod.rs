//! Terminal output for the CLI
//!
//! Uses `cliclack` for prompts and spinners and `indicatif` for transfer
//! bars, with automatic fallback to plain output in CI/non-interactive
//! environments or when stdout carries JSON.

mod context;
mod progress;
mod prompts;
pub mod report;

pub use context::UiContext;
pub use progress::{TaskSpinner, TransferProgress};
pub use prompts::confirm;
