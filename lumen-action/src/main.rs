//! Lumen Action
//!
//! A CI agent that runs Lumen visual tests for the change a workflow was
//! started for.
//!
//! Architecture:
//! - Configuration: workflow inputs and runner context via clap
//! - Repositories: HTTP communication with the testing service and GitHub
//! - Scheduler: polling a triggered job until it finishes
//! - Services: publishing the rendered report
//!
//! A run triggers one job, waits for it, writes step outputs and the run
//! summary, comments on the pull request and decides the exit status.

mod agent;
mod config;
mod event;
mod outputs;
mod repository;
mod scheduler;
mod service;
mod verdict;

use anyhow::Result;
use clap::Parser;
use colored::*;
use lumen_client::{GithubClient, ServiceClient};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::agent::{Agent, RunReport};
use crate::config::Config;
use crate::outputs::ActionOutputs;
use crate::repository::{CommentRepository, HttpCommentRepository, HttpJobRepository};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumen_action=info,lumen_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    config.validate()?;
    info!(
        "Loaded configuration: project_id={}, api_url={}",
        config.project_id, config.api_url
    );

    let change = event::load_change(
        config.event_path.as_deref(),
        config.sha.as_deref(),
        config.ref_name.as_deref(),
    )?;

    let client = ServiceClient::new(config.api_url.clone(), config.api_key.clone())
        .with_dashboard_url(config.dashboard_url.clone());
    let jobs = Arc::new(HttpJobRepository::new(client, config.project_id.clone()));

    let comments = match (config.github_token(), config.repo()) {
        (Some(token), Some(repo)) => {
            info!("Comments go to {}", repo);
            let github = GithubClient::new(config.github_api_url.clone(), token);
            Some(Arc::new(HttpCommentRepository::new(github, repo)) as Arc<dyn CommentRepository>)
        }
        _ => None,
    };

    let outputs = ActionOutputs::new(config.output_file.clone(), config.step_summary_file.clone());

    let report = match Agent::new(config, change, jobs, comments, outputs).run().await {
        Ok(report) => report,
        Err(e) => {
            error!("{:#}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    print_outcome(&report);
    Ok(exit_code(&report))
}

/// Logs the failure reason once and maps the verdict to the process status
fn exit_code(report: &RunReport) -> ExitCode {
    match &report.verdict {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!("{}", failure);
            ExitCode::FAILURE
        }
    }
}

fn print_outcome(report: &RunReport) {
    println!();
    match (&report.status, &report.verdict) {
        (None, _) => {
            println!("{}", "✓ Visual tests triggered".green().bold());
        }
        (Some(_), Ok(())) => {
            println!("{}", "✓ Visual tests finished".green().bold());
        }
        (Some(_), Err(_)) => {
            println!("{}", "✗ Visual tests failed".red().bold());
        }
    }

    println!("  Job:       {}", report.handle.id.bold());
    if let Some(status) = &report.status {
        println!("  Status:    {}", status);
        println!("  Result:    {}", report.result.result_label());
        println!(
            "  Issues:    {} ({} critical)",
            report.result.issues_summary.total, report.result.issues_summary.critical
        );
    }
    println!("  Dashboard: {}", report.handle.dashboard_url.cyan());
    if report.status.is_some() {
        println!(
            "  Comment:   {}",
            if report.comment_posted { "posted" } else { "not posted" }
        );
    }
}
