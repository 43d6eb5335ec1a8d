use std::path::{Path, PathBuf};

use async_std::{
    fs,
    io::{prelude::*, BufReader},
};
use async_trait::async_trait;

use crate::{error::Error, ReadLine, Result};

/// Reads lines without an index by reading the file from its start on every lookup. Slow on
/// large files, but trivially correct.
#[derive(Debug, Clone)]
pub struct ScanReader {
    path: PathBuf,
}

impl ScanReader {
    pub fn new<P: Into<PathBuf>>(path: P) -> ScanReader {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> Result<BufReader<fs::File>> {
        let file = fs::File::open(&self.path)
            .await
            .map_err(|e| Error::from_open(e, &self.path))?;
        Ok(BufReader::new(file))
    }
}

#[async_trait]
impl ReadLine for ScanReader {
    async fn read_line_raw(&self, line: usize) -> Result<Vec<u8>> {
        let mut reader = self.open().await?;
        let mut buf = Vec::new();

        for curr in 0..=line {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                return Err(Error::LineIndexOutOfRange { line, total: curr });
            }
        }

        Ok(buf)
    }

    async fn line_count(&self) -> Result<usize> {
        let mut reader = self.open().await?;
        let mut buf = Vec::new();
        let mut count = 0;

        while reader.read_until(b'\n', &mut buf).await? > 0 {
            buf.clear();
            count += 1;
        }

        Ok(count)
    }
}
