//! Repository layer
//!
//! Repositories are thin adapters over the HTTP clients. They give the
//! poll loop and the report publisher narrow, mockable interfaces and add
//! operation context to client errors.
//!
//! All repositories are trait-based to enable testing and mocking.

mod comments;
mod jobs;

// Re-export traits
pub use comments::CommentRepository;
pub use jobs::JobRepository;

// Re-export implementations
pub use comments::HttpCommentRepository;
pub use jobs::HttpJobRepository;

#[cfg(test)]
pub(crate) mod testing;
