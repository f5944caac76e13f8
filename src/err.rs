use std::process::{ExitCode, Termination};

/// Errors that stop payload generation.
///
/// All of them are fatal: the run stops and no payload file is written.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("unknown variant call file extension: {0}")]
    UnrecognizedExtension(String),
    #[error("unknown variant type: {file} (no marker in {hint:?})")]
    UnrecognizedVariantType { file: String, hint: String },
    #[error("data type not recognized for file: {0}")]
    UnrecognizedDataType(String),
    #[error("missing or non-string field in analysis record: {0}")]
    MissingField(String),
    #[error("pipeline info must be a mapping: {0}")]
    InvalidPipelineInfo(String),
    #[error("destination already exists: {0}")]
    DestinationExists(String),
}

impl Termination for PayloadError {
    fn report(self) -> ExitCode {
        match self {
            PayloadError::UnrecognizedExtension(_) => ExitCode::from(2),
            PayloadError::UnrecognizedVariantType { .. } => ExitCode::from(3),
            PayloadError::UnrecognizedDataType(_) => ExitCode::from(4),
            PayloadError::MissingField(_) | PayloadError::InvalidPipelineInfo(_) => {
                ExitCode::from(5)
            }
            PayloadError::DestinationExists(_) => ExitCode::from(6),
        }
    }
}
