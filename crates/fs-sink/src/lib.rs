//! Filesystem sink: stores uploaded files under a base directory.
//!
//! Blocking `std::fs` I/O by design — the processor always calls sinks from
//! the blocking thread pool. File names are validated before joining so an
//! upload cannot escape the base directory.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use streamstore_ingest::{SinkHandle, SinkWriter};

/// Writes each uploaded file to `base_dir/<file_name>`, creating intermediate
/// directories as needed. Re-uploading a name truncates the previous content.
pub struct FsSink {
    base_dir: PathBuf,
}

impl FsSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl SinkWriter for FsSink {
    fn open(&self, file_name: &str) -> io::Result<Box<dyn SinkHandle>> {
        validate_file_name(file_name)?;

        let path = self.base_dir.join(file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        debug!(path = %path.display(), "sink opened");

        Ok(Box::new(FsSinkHandle {
            writer: BufWriter::new(file),
            path,
        }))
    }
}

struct FsSinkHandle {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl SinkHandle for FsSinkHandle {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.writer.flush()?;
        debug!(path = %self.path.display(), "sink closed");
        Ok(())
    }
}

/// Validates an upload file name (no traversal, no absolute paths).
fn validate_file_name(name: &str) -> io::Result<()> {
    let invalid = |msg: String| io::Error::new(io::ErrorKind::InvalidInput, msg);

    if name.is_empty() {
        return Err(invalid("empty file name".into()));
    }

    if Path::new(name).is_absolute() {
        return Err(invalid(format!("absolute path not allowed: {name}")));
    }

    for component in Path::new(name).components() {
        if matches!(component, Component::ParentDir) {
            return Err(invalid(format!("parent traversal not allowed: {name}")));
        }
    }

    // Reject Windows-style prefixes.
    if name.len() >= 2 && name.as_bytes()[1] == b':' {
        return Err(invalid(format!("Windows drive prefix not allowed: {name}")));
    }
    if name.starts_with("\\\\") {
        return Err(invalid(format!("UNC path not allowed: {name}")));
    }

    Ok(())
}
