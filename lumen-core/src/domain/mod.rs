//! Core domain types
//!
//! These types describe a single visual-testing job as seen by the agent:
//! the handle returned on trigger, the status observed while polling, the
//! terminal result payload, and the testing configuration it was started with.

pub mod job;
pub mod result;
pub mod testing;
