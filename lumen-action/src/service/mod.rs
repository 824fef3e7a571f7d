//! Service layer
//!
//! Business logic that sits on top of the repositories: turning a finished
//! job into published reports.

mod report;

pub use report::publish_comment;
