//! Application Layer
//!
//! Use cases that orchestrate the provisioning flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `SetupUseCase` - Install nginx, configure the rsync daemon, rotate the secret
//! - `DeployUseCase` - Restart the daemon if needed, converge the vhost, sync files
//! - `RemoveUseCase` - Remove everything setup and deploy created
//!
//! ## Services
//!
//! - `CredentialManager` - rsync secret lifecycle and the ephemeral password file
//! - `ConfigConverger` - Upload and reload the vhost only when it changed

pub mod converger;
pub mod credentials;
pub mod deploy;
pub mod remove;
pub mod setup;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

pub use converger::ConfigConverger;
pub use credentials::{with_ephemeral_credential_file, CredentialManager, EphemeralCredentialFile};
pub use deploy::{DeployReport, DeployStep, DeployUseCase};
pub use remove::{RemoveReport, RemoveStep, RemoveUseCase};
pub use setup::{SetupReport, SetupStep, SetupUseCase};
pub use workflow::{run_plan, PlanStep, RemoteExecutor, StepOutcome, StepRecord};
