use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use audit_core::CsvArtifact;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {dir} is unusable: {source}")]
    OutputDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("writing {target}: {source}")]
    Write {
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates `dir` and any missing parents. Fails when `dir` names something
/// other than a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    fs::create_dir_all(dir).map_err(|source| PersistError::OutputDir {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Delivers exported artifacts into one directory. Each file is staged in a
/// temp file beside its target and renamed over it, so a reader never sees a
/// half-written export.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `artifact` under its own filename, replacing an earlier export.
    pub fn deliver(&self, artifact: &CsvArtifact) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;
        // Staging the temp file doubles as the writability check.
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(|source| {
            PersistError::OutputDir {
                dir: self.dir.clone(),
                source,
            }
        })?;

        let target = self.dir.join(artifact.filename);
        let write_err = |source| PersistError::Write {
            target: target.clone(),
            source,
        };
        staged
            .write_all(artifact.body.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(write_err)?;
        staged.persist(&target).map_err(|err| write_err(err.error))?;
        Ok(target)
    }
}
