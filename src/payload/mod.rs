//! Implementation of `generate` subcommand.

use std::path::PathBuf;

use crate::common::{
    io::{read_json, write_json_pretty},
    worker_version,
};

use self::{
    assemble::{assemble, WorkflowParams},
    schema::{AnalysisRecord, Record},
};

pub mod assemble;
pub mod classify;
pub mod describe;
pub mod pipeline_info;
pub mod sanitize;
pub mod schema;

/// Command line arguments for `generate` subcommand.
#[derive(Debug, clap::Parser)]
#[command(author, version, about = "generate payload for annotated variant calls", long_about = None)]
pub struct Args {
    /// Path to the JSON analysis record of the upstream sequencing experiment.
    #[arg(long)]
    pub path_analysis: String,
    /// Workflow name.
    #[arg(long)]
    pub workflow_name: String,
    /// Workflow version.
    #[arg(long)]
    pub workflow_version: String,
    /// Workflow run ID.
    #[arg(long)]
    pub run_id: String,
    /// Workflow session ID.
    #[arg(long)]
    pub session_id: String,
    /// Genome build; optional.
    #[arg(long)]
    pub genome_build: Option<String>,
    /// Genome annotation; optional.
    #[arg(long)]
    pub genome_annotation: Option<String>,
    /// Path to YAML file with pipeline information (tool versions); optional.
    #[arg(long)]
    pub path_pipeline_yml: Option<String>,
    /// Directory to write the `out/` directory and the payload to.
    #[arg(long, default_value = ".")]
    pub path_output: String,
    /// Annotated variant call files (`.vcf.gz`, `.vcf.gz.tbi`) to upload.
    #[arg(long, required = true, num_args = 1..)]
    pub path_files_to_upload: Vec<String>,
}

/// Name of the payload file for `workflow_name`.
pub fn payload_file_name(workflow_name: &str, id: uuid::Uuid) -> String {
    format!("{}.{}.payload.json", id, workflow_name.replace(' ', "_"))
}

/// Main entry point for `generate` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = std::time::Instant::now();
    tracing::info!("payload generator {}", worker_version());
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:#?}", &args);

    tracing::info!("loading analysis record...");
    let analysis: AnalysisRecord = read_json(&args.path_analysis)?;

    let pipeline_info = match &args.path_pipeline_yml {
        Some(path) => pipeline_info::load(path)?,
        None => Record::new(),
    };
    let params = WorkflowParams {
        workflow_name: args.workflow_name.clone(),
        workflow_version: args.workflow_version.clone(),
        genome_build: args.genome_build.clone(),
        run_id: args.run_id.clone(),
        session_id: args.session_id.clone(),
        genome_annotation: args.genome_annotation.clone(),
        pipeline_info,
    };

    let base_dir = PathBuf::from(&args.path_output);
    let raw_files = args
        .path_files_to_upload
        .iter()
        .map(PathBuf::from)
        .collect::<Vec<_>>();
    let date_str = chrono::Local::now().format("%Y%m%d").to_string();

    tracing::info!("assembling payload for {} file(s)...", raw_files.len());
    let payload = assemble(&analysis, &params, &raw_files, &date_str, &base_dir)?;

    let path_out = base_dir.join(payload_file_name(&args.workflow_name, uuid::Uuid::new_v4()));
    write_json_pretty(&path_out, &payload)?;
    tracing::info!("wrote payload to {}", path_out.display());

    tracing::info!(
        "All of `generate` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}
