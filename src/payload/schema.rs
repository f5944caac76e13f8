//! Input analysis record and output submission payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::err::PayloadError;

/// Free-form JSON object; key order is preserved.
pub type Record = serde_json::Map<String, Value>;

/// The `analysisType` block shared by input and output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisType {
    pub name: String,
}

/// Workflow block of the upstream analysis.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisWorkflow {
    pub workflow_short_name: String,
}

/// Reference to one file of the upstream analysis.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    #[serde(rename = "fileName")]
    pub file_name: String,
}

/// The upstream analysis record the payload is derived from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    #[serde(rename = "analysisId", default)]
    pub analysis_id: Option<String>,
    #[serde(rename = "studyId")]
    pub study_id: String,
    #[serde(rename = "analysisType")]
    pub analysis_type: AnalysisType,
    pub variant_class: String,
    pub workflow: AnalysisWorkflow,
    #[serde(default)]
    pub experiment: Record,
    #[serde(default)]
    pub samples: Vec<Record>,
    #[serde(default)]
    pub files: Vec<FileRef>,
    #[serde(default)]
    pub info: Option<Value>,
}

impl AnalysisRecord {
    fn first_sample(&self) -> Result<&Record, PayloadError> {
        self.samples
            .first()
            .ok_or_else(|| PayloadError::MissingField("samples[0]".into()))
    }

    /// `sampleId` of the first sample.
    pub fn sample_id(&self) -> Result<&str, PayloadError> {
        self.first_sample()?
            .get("sampleId")
            .and_then(Value::as_str)
            .ok_or_else(|| PayloadError::MissingField("samples[0].sampleId".into()))
    }

    /// `donorId` of the specimen of the first sample.
    pub fn donor_id(&self) -> Result<&str, PayloadError> {
        self.first_sample()?
            .get("specimen")
            .and_then(|specimen| specimen.get("donorId"))
            .and_then(Value::as_str)
            .ok_or_else(|| PayloadError::MissingField("samples[0].specimen.donorId".into()))
    }

    /// The file name that carries the variant type hint: the first entry of `files`.
    pub fn variant_type_hint(&self) -> Result<&str, PayloadError> {
        self.files
            .first()
            .map(|f| f.file_name.as_str())
            .ok_or_else(|| PayloadError::MissingField("files[0].fileName".into()))
    }
}

/// One upstream analysis consumed by the workflow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkflowInput {
    pub analysis_type: String,
    pub input_analysis_id: Option<String>,
}

/// Analysis type tag of the upstream analysis in `inputs`.
pub const INPUT_ANALYSIS_TYPE: &str = "sequencing_experiment";

/// Workflow block of the payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workflow {
    pub workflow_name: String,
    pub workflow_version: String,
    pub genome_build: Option<String>,
    pub run_id: String,
    pub session_id: String,
    pub pipeline_info: Record,
    pub inputs: Vec<WorkflowInput>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub genome_annotation: Option<String>,
}

/// Extra per-file information.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub data_category: String,
}

/// Access level recorded for every file.
pub const FILE_ACCESS: &str = "controlled";

/// Description of one file in the payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub file_md5sum: String,
    pub file_access: String,
    pub data_type: String,
    pub info: FileInfo,
}

/// The submission payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Payload {
    #[serde(rename = "analysisType")]
    pub analysis_type: AnalysisType,
    #[serde(rename = "studyId")]
    pub study_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub info: Option<Record>,
    pub workflow: Workflow,
    pub variant_class: String,
    pub files: Vec<FileDescriptor>,
    pub samples: Vec<Record>,
    pub experiment: Record,
}

impl Payload {
    /// The `experimental_strategy` of the experiment block.
    pub fn experimental_strategy(&self) -> Result<&str, PayloadError> {
        self.experiment
            .get("experimental_strategy")
            .and_then(Value::as_str)
            .ok_or_else(|| PayloadError::MissingField("experiment.experimental_strategy".into()))
    }
}
