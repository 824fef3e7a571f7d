//! Lumen Core
//!
//! Core types and pure logic for the Lumen visual-testing CI agent.
//!
//! This crate contains:
//! - Domain types: job handles, statuses, the terminal result payload and
//!   the testing configuration sent with a trigger
//! - DTOs: request/response shapes exchanged with the testing service
//! - Report rendering: the pull request comment and the run summary
//!
//! Nothing in here performs I/O.

pub mod domain;
pub mod dto;
pub mod report;
