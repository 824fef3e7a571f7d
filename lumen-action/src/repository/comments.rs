//! Comments repository
//!
//! Publishes the rendered report on the pull request thread.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lumen_client::{GithubClient, RepoRef};
use tracing::debug;

/// Repository trait for review-thread comments
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Posts a comment on a pull request
    ///
    /// # Arguments
    /// * `number` - Pull request number
    /// * `body` - Markdown body
    async fn post_comment(&self, number: u64, body: &str) -> Result<()>;
}

/// GitHub implementation of CommentRepository
pub struct HttpCommentRepository {
    client: GithubClient,
    repo: RepoRef,
}

impl HttpCommentRepository {
    pub fn new(client: GithubClient, repo: RepoRef) -> Self {
        Self { client, repo }
    }
}

#[async_trait]
impl CommentRepository for HttpCommentRepository {
    async fn post_comment(&self, number: u64, body: &str) -> Result<()> {
        let comment = self
            .client
            .create_issue_comment(&self.repo, number, body)
            .await
            .with_context(|| format!("Failed to comment on {}#{}", self.repo, number))?;

        debug!(
            "Posted comment {} ({})",
            comment.id,
            comment.html_url.as_deref().unwrap_or("no url")
        );
        Ok(())
    }
}
