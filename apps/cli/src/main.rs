//! Terminal front end for the resume screening pipeline.
//!
//! A thin shim over the workflow state machine: runs the four server
//! operations in step order (upload → parse + index → analyze), renders a
//! progress bar from the step states, and prints the final match report.

mod client;
mod workflow;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::client::{AnalysisReport, PipelineClient};
use crate::workflow::{FileMeta, Step, Workflow};

#[derive(Parser, Debug)]
#[command(
    name = "resume-screen",
    about = "Upload, parse, index, and analyze a resume against a job description"
)]
struct Cli {
    /// Path to the resume PDF
    resume: PathBuf,

    /// Job description text (inline)
    #[arg(long, conflicts_with = "job_description_file")]
    job_description: Option<String>,

    /// Read the job description from a file
    #[arg(long)]
    job_description_file: Option<PathBuf>,

    /// Pipeline API endpoint
    #[arg(long, env = "RESUME_API_URL", default_value = "http://localhost:3000")]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let job_description = match (&cli.job_description, &cli.job_description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read job description from {}", path.display()))?,
        (None, None) => bail!("provide --job-description or --job-description-file"),
    };
    if job_description.trim().is_empty() {
        bail!("job description is empty");
    }

    let api = PipelineClient::new(cli.api_url.clone());
    let mut flow = Workflow::new();
    let bar = progress_bar();

    // Step 1 — upload
    if !flow.begin(Step::Upload) {
        bail!("upload step is not available");
    }
    bar.set_message("Uploading resume");
    let uploaded = match api.upload_resume(&cli.resume).await {
        Ok(response) => response,
        Err(e) => {
            flow.failed(Step::Upload);
            bar.abandon_with_message("Upload failed");
            return Err(e).context("upload failed");
        }
    };
    flow.upload_succeeded(FileMeta {
        path: uploaded.file_path.clone(),
        name: uploaded.file_name.clone(),
    });
    bar.set_position(flow.progress_percent() as u64);

    // Step 2 — parse, then rebuild the index.
    // Parse is not done until BOTH sub-calls succeed.
    if !flow.begin(Step::Parse) {
        bail!("parse step is not available");
    }
    bar.set_message("Parsing resume");
    let parsed = match api.parse_resume(&uploaded.file_path).await {
        Ok(response) => response,
        Err(e) => {
            flow.failed(Step::Parse);
            bar.abandon_with_message("Parsing failed");
            return Err(e).context("parsing failed");
        }
    };
    bar.set_message("Building vector index");
    if let Err(e) = api.build_vector_db(&parsed.parsed_resume).await {
        flow.failed(Step::Parse);
        bar.abandon_with_message("Index build failed");
        return Err(e).context("index build failed");
    }
    flow.parse_succeeded(parsed.parsed_resume);
    bar.set_position(flow.progress_percent() as u64);

    // Step 3 — analyze
    if !flow.begin(Step::Analyze) {
        bail!("analyze step is not available");
    }
    bar.set_message("Analyzing against job description");
    let analyzed = match api.analyze_resume(&job_description).await {
        Ok(response) => response,
        Err(e) => {
            flow.failed(Step::Analyze);
            bar.abandon_with_message("Analysis failed");
            return Err(e).context("analysis failed");
        }
    };
    flow.analyze_succeeded(analyzed.analysis);
    bar.set_position(flow.progress_percent() as u64);
    bar.finish_with_message("Pipeline complete");

    if let Some(report) = flow.report() {
        render_report(report);
    }

    Ok(())
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.green/238}] {pos:>3}%  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Prints the match report. Fields the model left empty are skipped.
fn render_report(report: &AnalysisReport) {
    println!();
    println!("Match score: {:.0}/100", report.match_score);
    print_list("Strengths", &report.strengths);
    print_list("Weaknesses", &report.weaknesses);
    print_list("Missing skills", &report.missing_skills);
    if let Some(insights) = report.insights.as_deref().filter(|s| !s.trim().is_empty()) {
        println!();
        println!("Insights:");
        println!("  {insights}");
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{title}:");
    for item in items {
        println!("  - {item}");
    }
}
