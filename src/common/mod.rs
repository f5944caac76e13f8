//! Common functionality.

use std::{io::Read, path::Path};

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use md5::{Digest, Md5};

pub mod io;

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Return the version of the crate and `x.y.z` in tests.
pub fn worker_version() -> &'static str {
    if cfg!(test) {
        "x.y.z"
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

/// Size of the chunks read when hashing files.
const MD5_CHUNK_LEN: usize = 1024 * 1024;

/// Compute MD5 sum for file at `path`.
///
/// The file is streamed in fixed-size chunks so that large VCF files are never held in
/// memory at once.
pub fn md5sum<P>(path: P) -> Result<String, anyhow::Error>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    tracing::debug!("Computing MD5 checksum for {:?}", &path);
    let mut file = std::fs::File::open(&path)
        .map_err(|e| anyhow::anyhow!("could not open {:?} for hashing: {}", &path, e))?;
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; MD5_CHUNK_LEN];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    let hash = hasher.finalize();
    let mut buf = [0u8; 32];
    let checksum = base16ct::lower::encode_str(&hash, &mut buf)
        .map_err(|e| anyhow::anyhow!("could not hex-encode MD5 digest: {}", e))?;

    tracing::debug!(" MD5 = {}", &checksum);
    Ok(checksum.to_owned())
}

/// Size of the file at `path` in bytes; symbolic links are followed.
pub fn file_size<P>(path: P) -> Result<u64, anyhow::Error>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    let metadata = std::fs::metadata(&path)
        .map_err(|e| anyhow::anyhow!("could not stat {:?}: {}", &path, e))?;
    Ok(metadata.len())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    #[rstest::rstest]
    #[case(b"", "d41d8cd98f00b204e9800998ecf8427e")]
    #[case(b"hello world", "5eb63bbbe01eeed093cb22bb8f5acdc3")]
    #[case(
        b"The quick brown fox jumps over the lazy dog",
        "9e107d9d372bb6826bd81d3542a419d6"
    )]
    fn md5sum_of_content(
        #[case] content: &[u8],
        #[case] expected: &str,
    ) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("payload.txt");
        std::fs::write(&path, content)?;

        assert_eq!(expected, super::md5sum(&path)?);

        Ok(())
    }

    #[test]
    fn md5sum_spans_multiple_chunks() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("big.bin");
        let content = vec![b'a'; super::MD5_CHUNK_LEN * 2 + 17];
        std::fs::write(&path, &content)?;

        let mut hasher = <md5::Md5 as md5::Digest>::new();
        md5::Digest::update(&mut hasher, &content);
        let mut buf = [0u8; 32];
        let expected =
            base16ct::lower::encode_str(&md5::Digest::finalize(hasher), &mut buf).unwrap().to_owned();

        assert_eq!(expected, super::md5sum(&path)?);

        Ok(())
    }

    #[test]
    fn file_size_counts_bytes() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("sized.txt");
        std::fs::write(&path, b"0123456789")?;

        assert_eq!(10, super::file_size(&path)?);

        Ok(())
    }

    #[test]
    fn worker_version_in_tests() {
        assert_eq!("x.y.z", super::worker_version());
    }
}
