//! Interactive build flow (cliclack prompts, spinner, next steps)
//!
//! Only compiled with the `tui` feature.

#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use prompts::{run, CreateArgs};
