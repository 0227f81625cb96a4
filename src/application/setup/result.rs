//! Setup result

use serde::Serialize;

use crate::application::workflow::StepRecord;
use crate::domain::value_objects::SiteName;

/// Summary of a successful setup
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    pub site: SiteName,
    pub host: String,
    /// nginx was installed by this run
    pub installed_server: bool,
    /// An rsync password from an earlier setup was replaced
    pub replaced_credential: bool,
    pub steps: Vec<StepRecord>,
}
