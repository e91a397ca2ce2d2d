//! Error-line sources and the loaded error log

use crate::error::LogClusterError;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Identifier used for the bundled error list
pub const DEFAULT_LOG_SOURCE: &str = "error_log.txt";

/// Sample error lines bundled with the binary
pub const SAMPLE_ERRORS: &[&str] = &[
    "Connection refused while connecting to database at 10.0.0.12:5432",
    "Connection refused while connecting to database at 10.0.0.12:5432",
    "Connection refused while connecting to database at 10.0.0.14:5432",
    "Timeout waiting for response from payment gateway",
    "Timeout waiting for response from payment gateway",
    "Timeout waiting for response from inventory service",
    "  Disk quota exceeded on volume /var/lib/data  ",
    "Disk quota exceeded on volume /var/lib/data",
    "No space left on device while writing /var/log/app.log",
    "NullPointerException in OrderController.handleRequest",
    "NullPointerException in OrderController.handleRequest",
    "NullPointerException in UserController.updateProfile",
    "Authentication failed for user admin: invalid password",
    "Authentication failed for user deploy: invalid password",
    "Authentication failed for user deploy: token expired",
    "OutOfMemoryError: Java heap space in worker thread",
    "OutOfMemoryError: Java heap space in worker thread",
    "OOM killed process 4312 (worker)",
    "SSL handshake failed: certificate verify failed",
    "SSL handshake failed: certificate has expired",
    "Permission denied opening /etc/app/config.yaml",
    "Permission denied opening /etc/app/secrets.yaml",
    "Deadlock detected while updating table orders",
    "Deadlock detected while updating table payments",
    "HTTP 503 Service Unavailable from upstream cache",
];

/// Supplier of raw error strings, in source order
pub trait ErrorSource {
    /// Name of the source, used in logs and errors
    fn id(&self) -> &str;

    /// Produce every error string the source holds
    fn load(&self) -> crate::Result<Vec<String>>;
}

/// An in-memory list of errors
#[derive(Debug, Clone)]
pub struct BuiltinErrors {
    id: String,
    errors: Vec<String>,
}

impl BuiltinErrors {
    pub fn new<S: ToString>(id: &str, errors: &[S]) -> Self {
        Self {
            id: id.to_string(),
            errors: errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// The bundled sample list, identified by [`DEFAULT_LOG_SOURCE`]
    pub fn sample() -> Self {
        Self::new(DEFAULT_LOG_SOURCE, SAMPLE_ERRORS)
    }
}

impl ErrorSource for BuiltinErrors {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> crate::Result<Vec<String>> {
        Ok(self.errors.clone())
    }
}

/// A text file holding one error per line; blank lines are skipped
#[derive(Debug, Clone)]
pub struct FileErrors {
    path: PathBuf,
    id: String,
}

impl FileErrors {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let id = path.display().to_string();
        Self { path, id }
    }
}

impl ErrorSource for FileErrors {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> crate::Result<Vec<String>> {
        let contents =
            fs::read_to_string(&self.path).map_err(|e| LogClusterError::SourceUnavailable {
                source_id: self.id.clone(),
                reason: e.to_string(),
            })?;

        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Error strings loaded from one source
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorLog {
    /// Identifier of the source the records came from
    pub source_id: String,
    /// Raw error strings in source order, duplicates included
    pub records: Vec<String>,
}

/// Read every record from `source`
pub fn load_errors(source: &dyn ErrorSource) -> crate::Result<ErrorLog> {
    let records = source.load()?;
    debug!("Loaded {} errors from {}", records.len(), source.id());

    Ok(ErrorLog {
        source_id: source.id().to_string(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_keeps_order_and_duplicates() {
        let source = BuiltinErrors::new("mem", &["b", "a", "b"]);
        let log = load_errors(&source).unwrap();

        assert_eq!(log.source_id, "mem");
        assert_eq!(log.records, vec!["b", "a", "b"]);
        assert_eq!(log.records.len(), 3);
    }

    #[test]
    fn test_sample_source() {
        let log = load_errors(&BuiltinErrors::sample()).unwrap();
        assert_eq!(log.source_id, DEFAULT_LOG_SOURCE);
        assert_eq!(log.records.len(), SAMPLE_ERRORS.len());
    }

    #[test]
    fn test_file_source_skips_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "disk full").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  network timeout ").unwrap();

        let log = load_errors(&FileErrors::new(file.path())).unwrap();
        assert_eq!(log.records, vec!["disk full", "  network timeout "]);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileErrors::new(dir.path().join("missing.log"));

        let err = load_errors(&source).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LogClusterError>(),
            Some(LogClusterError::SourceUnavailable { .. })
        ));
    }
}
