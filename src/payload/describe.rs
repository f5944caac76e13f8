//! Inference of the per-file metadata attached to the payload.

use std::path::Path;

use crate::{
    common::{file_size, md5sum},
    err::PayloadError,
};

use super::{
    classify::VariantType,
    schema::{FileDescriptor, FileInfo, FILE_ACCESS},
};

/// Markers in canonical file names and the variant type they stand for.
///
/// Probed in order, the first hit wins.
pub const VARIANT_TYPE_MARKERS: &[(&str, VariantType)] = &[
    (".snv.", VariantType::Snv),
    (".indel.", VariantType::Indel),
    (".sv.", VariantType::Sv),
    (".cnv.", VariantType::Cnv),
];

/// Data type of index files.
pub const INDEX_DATA_TYPE: &str = "VCF Index";

/// `(variant type, is index, data type, data category)`
pub const DATA_TYPES: &[(VariantType, bool, &str, &str)] = &[
    (VariantType::Snv, false, "Raw SNV Calls", "Simple Nucleotide Variation"),
    (VariantType::Snv, true, INDEX_DATA_TYPE, "Simple Nucleotide Variation"),
    (VariantType::Indel, false, "Raw InDel Calls", "Simple Nucleotide Variation"),
    (VariantType::Indel, true, INDEX_DATA_TYPE, "Simple Nucleotide Variation"),
    (VariantType::Sv, false, "Raw SV Calls", "Structural Variation"),
    (VariantType::Sv, true, INDEX_DATA_TYPE, "Structural Variation"),
    (VariantType::Cnv, false, "Raw CNV Calls", "Copy Number Variation"),
    (VariantType::Cnv, true, INDEX_DATA_TYPE, "Copy Number Variation"),
];

/// Data type and category of the file called `file_name`.
///
/// `path` is only used for error reporting.
pub fn data_type_and_category(
    file_name: &str,
    path: &str,
) -> Result<(&'static str, &'static str), PayloadError> {
    let is_index = file_name.ends_with(".tbi");
    let variant_type = VARIANT_TYPE_MARKERS
        .iter()
        .find(|(marker, _)| file_name.contains(marker))
        .map(|(_, variant_type)| *variant_type)
        .ok_or_else(|| PayloadError::UnrecognizedDataType(path.to_string()))?;

    DATA_TYPES
        .iter()
        .find(|(vt, idx, _, _)| *vt == variant_type && *idx == is_index)
        .map(|(_, _, data_type, data_category)| (*data_type, *data_category))
        .ok_or_else(|| PayloadError::UnrecognizedDataType(path.to_string()))
}

/// `VCF` if the second-to-last dot-separated segment is `vcf`, `TBI` otherwise.
pub fn file_type(file_name: &str) -> &'static str {
    let mut segments = file_name.rsplit('.');
    segments.next();
    match segments.next() {
        Some("vcf") => "VCF",
        _ => "TBI",
    }
}

/// Describe the (canonically named) file at `path`.
pub fn describe_file(path: &Path) -> Result<FileDescriptor, anyhow::Error> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PayloadError::UnrecognizedDataType(path.display().to_string()))?;
    let (data_type, data_category) =
        data_type_and_category(file_name, &path.display().to_string())?;

    let descriptor = FileDescriptor {
        file_name: file_name.to_string(),
        file_type: file_type(file_name).to_string(),
        file_size: file_size(path)?,
        file_md5sum: md5sum(path)?,
        file_access: FILE_ACCESS.to_string(),
        data_type: data_type.to_string(),
        info: FileInfo {
            data_category: data_category.to_string(),
        },
    };
    tracing::debug!("descriptor = {:?}", &descriptor);

    Ok(descriptor)
}

/// Command line arguments for `describe` subcommand.
#[derive(Debug, clap::Parser)]
#[command(author, version, about = "describe canonically named variant call files", long_about = None)]
pub struct Args {
    /// Canonically named files to describe.
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<String>,
}

/// Main entry point for `describe` sub command.
///
/// Prints the descriptors as a JSON list to stdout.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let descriptors = args
        .paths
        .iter()
        .map(|path| describe_file(Path::new(path)))
        .collect::<Result<Vec<_>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&descriptors)?);

    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::{data_type_and_category, describe_file, file_type};
    use crate::{
        err::PayloadError,
        payload::{
            classify::VariantType,
            schema::{FileDescriptor, FileInfo},
        },
    };

    const SNV_VCF: &str = "ST1.DO1.SA1.wgs.20240101.mutect.somatic-germline.snv.annotated.vcf.gz";

    #[rstest]
    #[case("a.snv.annotated.vcf.gz", "Raw SNV Calls", "Simple Nucleotide Variation")]
    #[case("a.snv.annotated.vcf.gz.tbi", "VCF Index", "Simple Nucleotide Variation")]
    #[case("a.indel.annotated.vcf.gz", "Raw InDel Calls", "Simple Nucleotide Variation")]
    #[case("a.indel.annotated.vcf.gz.tbi", "VCF Index", "Simple Nucleotide Variation")]
    #[case("a.sv.annotated.vcf.gz", "Raw SV Calls", "Structural Variation")]
    #[case("a.sv.annotated.vcf.gz.tbi", "VCF Index", "Structural Variation")]
    #[case("a.cnv.annotated.vcf.gz", "Raw CNV Calls", "Copy Number Variation")]
    #[case("a.cnv.annotated.vcf.gz.tbi", "VCF Index", "Copy Number Variation")]
    fn data_type_table(
        #[case] name: &str,
        #[case] data_type: &str,
        #[case] data_category: &str,
    ) -> Result<(), anyhow::Error> {
        assert_eq!((data_type, data_category), data_type_and_category(name, name)?);

        Ok(())
    }

    #[test]
    fn data_type_table_is_exhaustive() {
        for variant_type in VariantType::iter() {
            for is_index in [false, true] {
                let rows = super::DATA_TYPES
                    .iter()
                    .filter(|(vt, idx, _, _)| *vt == variant_type && *idx == is_index)
                    .count();
                assert_eq!(1, rows, "{} index={}", variant_type, is_index);
            }
        }
    }

    #[rstest]
    #[case("a.snvx.vcf.gz")]
    #[case("a.structural.vcf.gz")]
    #[case("snv.vcf.gz")]
    fn data_type_unrecognized(#[case] name: &str) {
        assert_eq!(
            Err(PayloadError::UnrecognizedDataType(format!("out/{}", name))),
            data_type_and_category(name, &format!("out/{}", name))
        );
    }

    #[rstest]
    #[case("a.snv.annotated.vcf.gz", "VCF")]
    #[case("a.snv.annotated.vcf.gz.tbi", "TBI")]
    #[case("gz", "TBI")]
    fn file_type_from_name(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(expected, file_type(name));
    }

    #[test]
    fn describe_snv_vcf() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join(SNV_VCF);
        std::fs::write(&path, b"hello world")?;

        let descriptor = describe_file(&path)?;

        assert_eq!(
            FileDescriptor {
                file_name: SNV_VCF.into(),
                file_type: "VCF".into(),
                file_size: 11,
                file_md5sum: "5eb63bbbe01eeed093cb22bb8f5acdc3".into(),
                file_access: "controlled".into(),
                data_type: "Raw SNV Calls".into(),
                info: FileInfo {
                    data_category: "Simple Nucleotide Variation".into()
                },
            },
            descriptor
        );

        Ok(())
    }

    #[test]
    fn describe_snv_index() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join(format!("{}.tbi", SNV_VCF));
        std::fs::write(&path, b"")?;

        let descriptor = describe_file(&path)?;

        assert_eq!("TBI", descriptor.file_type);
        assert_eq!("VCF Index", descriptor.data_type);
        assert_eq!("Simple Nucleotide Variation", descriptor.info.data_category);
        assert_eq!(0, descriptor.file_size);

        Ok(())
    }

    #[test]
    fn describe_is_deterministic() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join(SNV_VCF);
        std::fs::write(&path, b"##fileformat=VCFv4.2\n")?;

        assert_eq!(describe_file(&path)?, describe_file(&path)?);

        Ok(())
    }

    #[test]
    fn describe_reports_path_without_marker() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("calls.annotated.vcf.gz");
        std::fs::write(&path, b"")?;

        let err = describe_file(&path).unwrap_err();

        assert_eq!(
            Some(&PayloadError::UnrecognizedDataType(path.display().to_string())),
            err.downcast_ref::<PayloadError>()
        );

        Ok(())
    }

    #[test]
    fn run_fails_on_first_unrecognized_file() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let good = tmp_dir.join(SNV_VCF);
        let bad = tmp_dir.join("calls.vcf.gz");
        std::fs::write(&good, b"")?;
        std::fs::write(&bad, b"")?;

        let args = super::Args {
            paths: vec![good.display().to_string(), bad.display().to_string()],
        };
        let err = super::run(&Default::default(), &args).unwrap_err();

        assert_eq!(
            Some(&PayloadError::UnrecognizedDataType(bad.display().to_string())),
            err.downcast_ref::<PayloadError>()
        );

        Ok(())
    }

    #[test]
    fn json_field_names() -> Result<(), anyhow::Error> {
        let descriptor = FileDescriptor {
            file_name: SNV_VCF.into(),
            file_type: "VCF".into(),
            file_size: 3,
            file_md5sum: "abc".into(),
            file_access: "controlled".into(),
            data_type: "Raw SNV Calls".into(),
            info: FileInfo {
                data_category: "Simple Nucleotide Variation".into(),
            },
        };

        assert_eq!(
            serde_json::json!({
                "fileName": SNV_VCF,
                "fileType": "VCF",
                "fileSize": 3,
                "fileMd5sum": "abc",
                "fileAccess": "controlled",
                "dataType": "Raw SNV Calls",
                "info": {"data_category": "Simple Nucleotide Variation"}
            }),
            serde_json::to_value(&descriptor)?
        );

        Ok(())
    }
}
