//! Common, IO-related code.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::err::PayloadError;

/// Read a JSON document from `path` into `T`.
pub fn read_json<T, P>(path: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    tracing::trace!("Opening {:?} as JSON for reading", path.as_ref());
    let reader = File::open(path.as_ref())
        .map(BufReader::new)
        .map_err(|e| anyhow::anyhow!("could not open {:?}: {}", path.as_ref(), e))?;
    serde_json::from_reader(reader)
        .map_err(|e| anyhow::anyhow!("could not parse JSON from {:?}: {}", path.as_ref(), e))
}

/// Read a YAML document from `path` into `T`.
pub fn read_yaml<T, P>(path: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    tracing::trace!("Opening {:?} as YAML for reading", path.as_ref());
    let reader = File::open(path.as_ref())
        .map(BufReader::new)
        .map_err(|e| anyhow::anyhow!("could not open {:?}: {}", path.as_ref(), e))?;
    serde_yaml::from_reader(reader)
        .map_err(|e| anyhow::anyhow!("could not parse YAML from {:?}: {}", path.as_ref(), e))
}

/// Write `value` as JSON pretty-printed with two-space indentation.
pub fn write_json_pretty<T, P>(path: P, value: &T) -> Result<(), anyhow::Error>
where
    T: Serialize,
    P: AsRef<Path>,
{
    tracing::trace!("Opening {:?} as JSON for writing", path.as_ref());
    let mut writer = File::create(path.as_ref())
        .map(BufWriter::new)
        .map_err(|e| anyhow::anyhow!("could not create {:?}: {}", path.as_ref(), e))?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Create directory `path` unless it already exists.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), anyhow::Error> {
    match std::fs::create_dir(path.as_ref()) {
        Ok(()) => {
            tracing::debug!("Created directory {:?}", path.as_ref());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && path.as_ref().is_dir() => {
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "could not create directory {:?}: {}",
            path.as_ref(),
            e
        )),
    }
}

/// Make the content of `src` available at `dst`.
///
/// A symbolic link to the absolute path of `src` is created; on platforms without symbolic
/// links the file is copied.  An existing `dst` is never replaced.
pub fn place_file<P, Q>(src: P, dst: Q) -> Result<PathBuf, anyhow::Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let src = std::fs::canonicalize(src.as_ref())
        .map_err(|e| anyhow::anyhow!("could not resolve {:?}: {}", src.as_ref(), e))?;
    let dst = dst.as_ref();
    if dst.symlink_metadata().is_ok() {
        return Err(PayloadError::DestinationExists(dst.display().to_string()).into());
    }

    tracing::debug!("Linking {:?} -> {:?}", dst, &src);
    link_or_copy(&src, dst).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            anyhow::Error::from(PayloadError::DestinationExists(dst.display().to_string()))
        } else {
            anyhow::anyhow!("could not place {:?} at {:?}: {}", &src, dst, e)
        }
    })?;

    Ok(dst.to_path_buf())
}

#[cfg(unix)]
fn link_or_copy(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(not(unix))]
fn link_or_copy(src: &Path, dst: &Path) -> std::io::Result<()> {
    let mut reader = File::open(src)?;
    let mut writer = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)?;
    std::io::copy(&mut reader, &mut writer)?;
    Ok(())
}
