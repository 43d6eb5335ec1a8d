//! Serve single lines of a large text file using a line index that is built once, on first use

/// Reading the served file from the environment
pub mod config;
pub mod error;
/// The index of files
pub mod index;
/// A reader seeking directly to lines using a lazily built index
pub mod indexed;
/// A reader scanning the file from the start on every lookup
pub mod scan;
/// Request boundary mapping errors to status codes
pub mod service;

pub use config::{Config, Strategy};
pub use error::Error;
pub use index::Index;
pub use indexed::{IndexState, IndexedReader};
pub use scan::ScanReader;
pub use service::LineService;

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, error::Error>;

/// A trait defining behavior for reading certain lines of the served file.
#[async_trait]
pub trait ReadLine: Send + Sync {
    /// Reads the given line, including its terminating `\n` if there is one.
    async fn read_line_raw(&self, line: usize) -> Result<Vec<u8>>;

    /// Returns the amount of lines in the served file.
    async fn line_count(&self) -> Result<usize>;

    /// Reads the given line as utf-8 text
    async fn read_line(&self, line: usize) -> Result<String> {
        let raw = self.read_line_raw(line).await?;
        Ok(String::from_utf8(raw)?)
    }

    /// Does any expensive one-time work up front, so the first lookup isn't slower than all
    /// the others.
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }
}

/// Opens a reader for `path` using the given strategy. No io happens here.
pub fn open_reader<P: Into<PathBuf>>(path: P, strategy: Strategy) -> Arc<dyn ReadLine> {
    match strategy {
        Strategy::Indexed => Arc::new(IndexedReader::new(path)),
        Strategy::Scan => Arc::new(ScanReader::new(path)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn fixture(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[async_std::test]
    async fn test_strategies_agree() {
        let file = fixture("I am line 0\nI am line 1\nI am line 2\n");

        for strategy in [Strategy::Indexed, Strategy::Scan] {
            let reader = open_reader(file.path(), strategy);
            reader.prepare().await.unwrap();

            assert_eq!(reader.line_count().await.unwrap(), 3);
            assert_eq!(reader.read_line(0).await.unwrap(), "I am line 0\n");
            assert_eq!(reader.read_line(1).await.unwrap(), "I am line 1\n");
            assert!(reader.read_line(3).await.unwrap_err().is_out_of_range());
        }
    }

    #[async_std::test]
    async fn test_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, b'\n']).unwrap();

        let reader = open_reader(file.path(), Strategy::Indexed);
        assert_eq!(reader.read_line_raw(0).await.unwrap(), vec![0xff, 0xfe, b'\n']);
        assert!(matches!(reader.read_line(0).await, Err(Error::Utf8(_))));
    }
}
