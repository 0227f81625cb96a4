//! Remove result

use serde::Serialize;

use crate::application::workflow::StepRecord;
use crate::domain::value_objects::SiteName;

/// Summary of a successful removal
#[derive(Debug, Clone, Serialize)]
pub struct RemoveReport {
    pub site: SiteName,
    pub host: String,
    pub steps: Vec<StepRecord>,
}
