//! Remove Module
//!
//! Tears a site down again: nginx vhost, web root, rsync secret and module,
//! and the `rsync_password` in the local site document. Every step deletes
//! only if present, so running it twice is safe.

mod result;
mod use_case;

pub use result::RemoveReport;
pub use use_case::{RemoveStep, RemoveUseCase};
