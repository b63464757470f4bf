//! Worker-side command line client.
//!
//! Issues exactly one coordinator API call, writes the raw response JSON
//! to a file, and prints the HTTP status code. Retry and backoff belong
//! to the calling process.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    Register,
    Assign,
    Submit,
    AddTask,
    FinishAll,
}

#[derive(Parser, Debug)]
#[command(name = "foreman-cli", about = "Issue one foreman API call")]
struct Args {
    /// Coordinator base URL, e.g. http://127.0.0.1:7290
    #[arg(long, env = "FOREMAN_URL")]
    url: String,

    /// Worker identifier (required for register/assign/submit)
    #[arg(long)]
    worker_id: Option<String>,

    /// Which API call to perform
    #[arg(long, value_enum)]
    action: Action,

    /// Item ids to ingest (add-task only)
    #[arg(long, num_args = 1.., value_name = "ITEM")]
    task_content: Vec<u64>,

    /// Optional re-chunking size for add-task
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Where to write the raw response JSON
    #[arg(long, default_value = "foreman_response.json")]
    output: PathBuf,
}

impl Args {
    fn worker_id(&self) -> Result<&str> {
        self.worker_id
            .as_deref()
            .context("--worker-id is required for this action")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = reqwest::Client::new();

    let request = match args.action {
        Action::Register => client
            .post(format!("{}/worker_register", args.url))
            .json(&serde_json::json!({"worker_id": args.worker_id()?})),
        Action::Assign => client
            .post(format!("{}/assign_task", args.url))
            .query(&[("worker_id", args.worker_id()?)]),
        Action::Submit => client
            .post(format!("{}/submit_task", args.url))
            .query(&[("worker_id", args.worker_id()?)]),
        Action::AddTask => {
            anyhow::ensure!(
                !args.task_content.is_empty(),
                "--task-content is required for add-task"
            );
            client
                .post(format!("{}/add_task", args.url))
                .json(&serde_json::json!({
                    "task_content": args.task_content,
                    "chunk_size": args.chunk_size,
                }))
        }
        Action::FinishAll => client.post(format!("{}/finish_all", args.url)),
    };

    let response = request.send().await.context("request failed")?;
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("response body was not JSON")?;

    std::fs::write(&args.output, serde_json::to_string_pretty(&body)?)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    print!("{}", status.as_u16());
    Ok(())
}
