//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod converge;
mod layout;
mod site_name;
mod sync_event;

pub use converge::{ConvergeOutcome, RemoteState};
pub use layout::{ServerLayout, RSYNC_DAEMON_PORT};
pub use site_name::{SiteName, SiteNameError, MAX_SITE_NAME_LEN};
pub use sync_event::{
    classify_line, SyncCategory, SyncEvent, SyncTally, CREATING_DIR_CODE, DELETING_CODE,
};
