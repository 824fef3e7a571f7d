//! Data Transfer Objects for the testing service API
//!
//! Request bodies sent by the agent and the response adapters that
//! normalize what the service sends back.

pub mod envelope;
pub mod job;
