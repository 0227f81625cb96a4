//! Setup Module
//!
//! Prepares a host for a site: installs nginx when missing, configures the
//! rsync daemon module and rotates the transfer credential.
//!
//! ## Usage
//!
//! ```ignore
//! use jamal::application::setup::SetupUseCase;
//!
//! let use_case = SetupUseCase::new(channel, repository);
//! let report = use_case.execute(&site)?;
//! ```

mod result;
mod use_case;

pub use result::SetupReport;
pub use use_case::{SetupStep, SetupUseCase};
