//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//!
//! ## Usage
//!
//! ```ignore
//! use jamal::presentation::factory;
//!
//! let use_case = factory::create_deploy_use_case();
//! let report = use_case.execute(&site)?;
//! ```

pub mod cli;
pub mod factory;

pub use cli::{Cli, ColorWhen, Commands};
pub use factory::{
    create_deploy_use_case, create_remove_use_case, create_setup_use_case, create_site_repository,
};
