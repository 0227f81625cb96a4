//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::Path;

use crate::application::{DeployUseCase, RemoveUseCase, SetupUseCase};
use crate::infrastructure::{RsyncDaemonTransfer, SshChannel, TcpPortProbe, YamlSiteRepository};

/// Type alias for the concrete SetupUseCase with all dependencies
pub type ConcreteSetupUseCase = SetupUseCase<SshChannel, YamlSiteRepository>;

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<SshChannel, RsyncDaemonTransfer, TcpPortProbe>;

/// Type alias for the concrete RemoveUseCase with all dependencies
pub type ConcreteRemoveUseCase = RemoveUseCase<SshChannel, YamlSiteRepository>;

/// Repository for the site document at `config_path`
pub fn create_site_repository(config_path: &Path) -> YamlSiteRepository {
    YamlSiteRepository::new(config_path)
}

/// Create a setup use case that persists the new credential to `config_path`
pub fn create_setup_use_case(config_path: &Path) -> ConcreteSetupUseCase {
    SetupUseCase::new(SshChannel::new(), create_site_repository(config_path))
}

/// Create a deploy use case with all dependencies wired up
pub fn create_deploy_use_case() -> ConcreteDeployUseCase {
    DeployUseCase::new(
        SshChannel::new(),
        RsyncDaemonTransfer::new(),
        TcpPortProbe::new(),
    )
}

/// Create a remove use case that clears the credential from `config_path`
pub fn create_remove_use_case(config_path: &Path) -> ConcreteRemoveUseCase {
    RemoveUseCase::new(SshChannel::new(), create_site_repository(config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SiteRepository;

    #[test]
    fn repository_points_at_config_path() {
        let repo = create_site_repository(Path::new("site.yml"));
        assert_eq!(repo.location(), Path::new("site.yml"));
    }
}
