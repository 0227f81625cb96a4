//! Deploy Module
//!
//! Publishes a site: makes sure the rsync daemon runs, converges the nginx
//! virtual host and syncs `local_path` to the daemon module.
//!
//! ## Structure
//!
//! - `result` - Result types (`DeployReport`)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use jamal::application::deploy::DeployUseCase;
//!
//! let use_case = DeployUseCase::new(channel, transfer, probe);
//! let report = use_case.execute(&site)?;
//! ```

mod result;
mod use_case;

pub use result::DeployReport;
pub use use_case::{normalized_source, DeployStep, DeployUseCase};

#[cfg(test)]
mod tests;
