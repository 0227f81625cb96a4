//! Deploy result

use serde::Serialize;

use crate::application::workflow::StepRecord;
use crate::domain::value_objects::{ConvergeOutcome, SiteName, SyncTally};

/// Summary of a successful deploy
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub site: SiteName,
    pub host: String,
    /// The daemon was not running and had to be restarted
    pub restarted_daemon: bool,
    pub vhost: ConvergeOutcome,
    pub sync: SyncTally,
    pub steps: Vec<StepRecord>,
}

impl DeployReport {
    pub fn is_noop(&self) -> bool {
        self.vhost == ConvergeOutcome::Unchanged && self.sync.changes() == 0
    }
}
