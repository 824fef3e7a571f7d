//! Scheduler layer for the action
//!
//! Owns the wait between trigger and report: the bounded, strictly
//! sequential status poll of a single job.

pub mod poller;

pub use poller::{JobPoller, PollOutcome};
