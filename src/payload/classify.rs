//! Classification and canonical renaming of annotated variant call files.

use std::path::{Path, PathBuf};

use crate::{
    common::io::{ensure_dir, place_file},
    err::PayloadError,
};

use super::schema::{AnalysisRecord, Payload};

/// Name of the directory the renamed files are placed in.
pub const OUT_DIR: &str = "out";

/// Accepted file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Extension {
    /// bgzip-compressed VCF file
    #[strum(serialize = "vcf.gz")]
    VcfGz,
    /// tabix index of a bgzip-compressed VCF file
    #[strum(serialize = "vcf.gz.tbi")]
    VcfGzTbi,
}

impl Extension {
    /// Determine the extension of `file_name`.
    pub fn from_file_name(file_name: &str) -> Result<Self, PayloadError> {
        if file_name.ends_with(".vcf.gz") {
            Ok(Extension::VcfGz)
        } else if file_name.ends_with(".vcf.gz.tbi") {
            Ok(Extension::VcfGzTbi)
        } else {
            Err(PayloadError::UnrecognizedExtension(file_name.to_string()))
        }
    }
}

/// The variant types a file can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum VariantType {
    /// simple nucleotide variants
    Snv,
    /// small insertions and deletions
    Indel,
    /// structural variants
    Sv,
    /// copy number variants
    Cnv,
}

/// Substrings of the upstream file name and the variant type they indicate.
///
/// Probed in order, the first hit wins.
pub const VARIANT_TYPE_HINTS: &[(&str, VariantType)] = &[
    ("snv", VariantType::Snv),
    ("indel", VariantType::Indel),
    ("rearrangement", VariantType::Sv),
    ("copy_number", VariantType::Cnv),
];

/// Infer the variant type from the upstream file name `hint`.
///
/// `file` is only used for error reporting.
pub fn infer_variant_type(hint: &str, file: &str) -> Result<VariantType, PayloadError> {
    let hint_lower = hint.to_lowercase();
    VARIANT_TYPE_HINTS
        .iter()
        .find(|(marker, _)| hint_lower.contains(marker))
        .map(|(_, variant_type)| *variant_type)
        .ok_or_else(|| PayloadError::UnrecognizedVariantType {
            file: file.to_string(),
            hint: hint.to_string(),
        })
}

/// Canonical name of an annotated variant call file.
///
/// Renders as `study.donor.sample.strategy.date.workflow.class.type.annotated.ext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalFileName {
    pub study_id: String,
    pub donor_id: String,
    pub sample_id: String,
    /// lower-case experimental strategy, e.g. `wgs`
    pub experimental_strategy: String,
    /// `YYYYMMDD`
    pub date: String,
    pub workflow_short_name: String,
    /// lower-case, commas replaced by hyphens
    pub variant_class: String,
    pub variant_type: VariantType,
    pub extension: Extension,
}

impl CanonicalFileName {
    /// Build the canonical name of `raw_file`.
    ///
    /// The extension is checked before anything else; the variant type comes from the
    /// first file of `analysis`, not from `raw_file`.
    pub fn new(
        raw_file: &Path,
        payload: &Payload,
        analysis: &AnalysisRecord,
        date_str: &str,
    ) -> Result<Self, PayloadError> {
        let file = raw_file.display().to_string();
        let extension = Extension::from_file_name(&file)?;
        let variant_type = infer_variant_type(analysis.variant_type_hint()?, &file)?;

        Ok(Self {
            study_id: payload.study_id.clone(),
            donor_id: analysis.donor_id()?.to_string(),
            sample_id: analysis.sample_id()?.to_string(),
            experimental_strategy: payload.experimental_strategy()?.to_lowercase(),
            date: date_str.to_string(),
            workflow_short_name: analysis.workflow.workflow_short_name.clone(),
            variant_class: analysis.variant_class.replace(',', "-").to_lowercase(),
            variant_type,
            extension,
        })
    }
}

impl std::fmt::Display for CanonicalFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}.{}.{}.{}.annotated.{}",
            self.study_id,
            self.donor_id,
            self.sample_id,
            self.experimental_strategy,
            self.date,
            self.workflow_short_name,
            self.variant_class,
            self.variant_type,
            self.extension
        )
    }
}

/// Place `raw_file` under its canonical name in `OUT_DIR` below `base_dir`.
///
/// Returns the path of the placed file.
pub fn classify_and_place(
    raw_file: &Path,
    payload: &Payload,
    analysis: &AnalysisRecord,
    date_str: &str,
    base_dir: &Path,
) -> Result<PathBuf, anyhow::Error> {
    let name = CanonicalFileName::new(raw_file, payload, analysis, date_str)?;
    tracing::info!("{} -> {}", raw_file.display(), &name);

    let out_dir = base_dir.join(OUT_DIR);
    ensure_dir(&out_dir)?;
    place_file(raw_file, out_dir.join(name.to_string()))
}
