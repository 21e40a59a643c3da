//! File Host Store
//!
//! Hosts-file backed implementation of [`HostStore`].

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{HostError, Result};
use crate::record::HostRecord;

use super::codec::{decode_line, encode_line};
use super::{HostFilter, HostStore};

/// Store that owns one dnsmasq hosts file
///
/// The file is opened, read and closed on every call; no handle outlives a
/// method. Writes replace the whole file through a hidden temporary sibling,
/// unique per write, that is renamed over the target.
///
/// A missing file is an I/O error, not an empty set. Use [`FileHostStore::create`]
/// for a fresh installation.
#[derive(Debug, Clone)]
pub struct FileHostStore {
    /// Path of the hosts file
    path: PathBuf,
}

impl FileHostStore {
    /// Wrap an existing hosts file (not touched until the first operation)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Wrap a hosts file, creating it empty if it does not exist yet
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);

        if !store.path.exists() {
            if let Some(parent) = store.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            File::create(&store.path)?;
            tracing::info!("Created empty hosts file {}", store.path.display());
        }

        Ok(store)
    }

    /// Get the hosts file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read and decode every record line
    fn load(&self) -> Result<Vec<HostRecord>> {
        let file = File::open(&self.path).map_err(|e| {
            tracing::error!("Error reading hosts file {}: {}", self.path.display(), e);
            HostError::Io(e)
        })?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;

            match decode_line(&line) {
                Ok(Some(record)) => {
                    tracing::trace!("Parsed line {}: {}", line_number, line);
                    records.push(record);
                }
                Ok(None) => {
                    tracing::debug!("Skipping line {}: {}", line_number, line);
                }
                Err(HostError::MalformedRecord { reason, .. }) => {
                    tracing::error!(
                        "Failed to parse dhcp-host entry in {} at line {}: {}",
                        self.path.display(),
                        line_number,
                        reason
                    );
                    return Err(HostError::MalformedRecord {
                        line: line_number,
                        reason,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(records)
    }

    /// Encode all records and replace the file contents
    fn save(&self, records: &[HostRecord]) -> Result<()> {
        let mut contents = String::with_capacity(records.len() * 48);
        for record in records {
            contents.push_str(&encode_line(record));
            contents.push('\n');
        }

        self.replace_contents(contents.as_bytes()).map_err(|e| {
            tracing::error!("Error writing hosts file {}: {}", self.path.display(), e);
            HostError::Io(e)
        })?;

        tracing::trace!(
            "Wrote {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Write `contents` to a fresh hidden temp file beside the target, then
    /// rename it over the target
    ///
    /// Each call gets its own temp file, so overlapping writers never share
    /// one. A symlinked hosts file is resolved first: the link stays and the
    /// file it points at is replaced. The target's permission bits are copied
    /// onto the new file; ownership becomes the writing process's.
    fn replace_contents(&self, contents: &[u8]) -> std::io::Result<()> {
        let target = fs::canonicalize(&self.path)?;
        let permissions = fs::metadata(&target)?.permissions();
        let dir = target.parent().unwrap_or_else(|| Path::new("."));

        // dnsmasq's `conf-dir` ignores dot-files
        let prefix = format!(
            ".{}.",
            target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "hosts".to_string())
        );

        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)?;
        temp.write_all(contents)?;
        temp.as_file().sync_all()?;
        temp.as_file().set_permissions(permissions)?;

        // Dropping an unpersisted temp file removes it
        temp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }
}

impl HostStore for FileHostStore {
    fn load_all(&self) -> Result<Vec<HostRecord>> {
        self.load()
    }

    fn find_one(&self, filter: &HostFilter) -> Result<Option<HostRecord>> {
        let records = self.load()?;
        Ok(records.into_iter().find(|record| filter.matches(record)))
    }

    fn append(&self, record: &HostRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record.clone());
        self.save(&records)
    }

    fn delete_one(&self, filter: &HostFilter) -> Result<Option<HostRecord>> {
        let mut records = self.load()?;

        let Some(position) = records.iter().position(|record| filter.matches(record)) else {
            return Ok(None);
        };

        let removed = records.remove(position);
        self.save(&records)?;
        Ok(Some(removed))
    }
}
