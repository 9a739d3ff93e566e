use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot prepare {}: {source}", path.display())]
    ExportDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("writing {name} failed: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Creates `dir` and its parents unless it is already a directory.
pub fn ensure_export_dir(dir: &Path) -> Result<(), PersistError> {
    let prepare_err = |source: io::Error| PersistError::ExportDir {
        path: dir.to_path_buf(),
        source,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(prepare_err)
        }
        Err(err) => Err(prepare_err(err)),
    }
}

/// Stages each export next to its destination and renames it into place.
/// An existing file with the same name is replaced.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_export_dir(&self.dir)?;

        let write_err = |source: io::Error| PersistError::Write {
            name: name.to_string(),
            source,
        };
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        staged.write_all(content).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;

        let target = self.dir.join(name);
        staged.persist(&target).map_err(|err| write_err(err.error))?;
        Ok(target)
    }
}
