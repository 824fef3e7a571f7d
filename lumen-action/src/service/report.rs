//! Report publishing
//!
//! The comment is best effort. Neither a rendering problem nor a rejected
//! write is allowed to change the outcome of the run.

use lumen_core::domain::job::FinalStatus;
use lumen_core::domain::result::JobResult;
use lumen_core::report::{RenderContext, render_comment};
use tracing::{info, warn};

use crate::repository::CommentRepository;

/// Renders the report and posts it on pull request `number`
///
/// # Returns
/// `true` when the comment was posted
pub async fn publish_comment(
    comments: &dyn CommentRepository,
    number: u64,
    status: &FinalStatus,
    result: &JobResult,
    ctx: &RenderContext,
) -> bool {
    let body = match render_comment(status, result, ctx) {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to render report comment: {}", e);
            return false;
        }
    };

    match comments.post_comment(number, &body).await {
        Ok(()) => {
            info!("Posted results to pull request #{}", number);
            true
        }
        Err(e) => {
            warn!("Failed to post results to pull request #{}: {:#}", number, e);
            false
        }
    }
}
