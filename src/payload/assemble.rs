//! Assembly of the submission payload from the upstream analysis.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{
    classify::classify_and_place,
    describe::describe_file,
    sanitize::sanitize,
    schema::{AnalysisRecord, Payload, Record, Workflow, WorkflowInput, INPUT_ANALYSIS_TYPE},
};

/// Parameters of the workflow run that produced the files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowParams {
    pub workflow_name: String,
    pub workflow_version: String,
    pub genome_build: Option<String>,
    pub run_id: String,
    pub session_id: String,
    pub genome_annotation: Option<String>,
    /// Normalised pipeline information, see `pipeline_info::normalize`.
    pub pipeline_info: Record,
}

/// Copy of `experiment` with `library_strategy` moved to `experimental_strategy`.
pub fn rename_library_strategy(experiment: &Record) -> Record {
    let mut result = experiment.clone();
    if let Some(strategy) = result.shift_remove("library_strategy") {
        result.insert("experimental_strategy".to_string(), strategy);
    }
    result
}

/// Build the payload without any files.
pub fn skeleton(analysis: &AnalysisRecord, params: &WorkflowParams) -> Payload {
    let info = match &analysis.info {
        Some(Value::Object(info)) => Some(info.clone()),
        _ => None,
    };

    Payload {
        analysis_type: analysis.analysis_type.clone(),
        study_id: analysis.study_id.clone(),
        info,
        workflow: Workflow {
            workflow_name: params.workflow_name.clone(),
            workflow_version: params.workflow_version.clone(),
            genome_build: params.genome_build.clone(),
            run_id: params.run_id.clone(),
            session_id: params.session_id.clone(),
            pipeline_info: params.pipeline_info.clone(),
            inputs: vec![WorkflowInput {
                analysis_type: INPUT_ANALYSIS_TYPE.to_string(),
                input_analysis_id: analysis.analysis_id.clone(),
            }],
            genome_annotation: params.genome_annotation.clone(),
        },
        variant_class: analysis.variant_class.clone(),
        files: Vec::new(),
        samples: sanitize(&analysis.samples),
        experiment: rename_library_strategy(&analysis.experiment),
    }
}

/// Assemble the complete payload.
///
/// Each of `raw_files` is renamed into `base_dir/out` and described, in order.  The first
/// failing file aborts the assembly.
pub fn assemble(
    analysis: &AnalysisRecord,
    params: &WorkflowParams,
    raw_files: &[PathBuf],
    date_str: &str,
    base_dir: &Path,
) -> Result<Payload, anyhow::Error> {
    let mut payload = skeleton(analysis, params);

    for raw_file in raw_files {
        let placed = classify_and_place(raw_file, &payload, analysis, date_str, base_dir)?;
        let descriptor = describe_file(&placed)?;
        payload.files.push(descriptor);
    }
    tracing::info!("described {} file(s)", payload.files.len());

    Ok(payload)
}
