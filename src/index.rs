use std::path::Path;

use async_std::{
    fs,
    io::{prelude::*, BufRead, BufReader},
};
use itertools::Itertools;
use log::debug;

use crate::{error::Error, Result};

/// Contains an in-memory line-index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Index {
    /// Maps line to seek position in order to seek efficiently. The index within the Vec represents
    /// the line-index in the file
    inner: Vec<u64>,
}

impl Index {
    /// Create a new Index from precomputed line offsets. Expects the offsets to be properly built.
    pub fn new(lines: Vec<u64>) -> Index {
        Self { inner: lines }
    }

    /// Build a new index for text within `reader`, holding only a single line in memory at a
    /// time. The last line is counted even if it isn't terminated by a `\n`.
    pub async fn build<R: BufRead + Unpin>(reader: &mut R) -> Result<Self> {
        let mut line_index: Vec<u64> = Vec::new();
        let mut curr_offset: u64 = 0;

        let mut buff = Vec::with_capacity(1000);

        loop {
            buff.clear();
            let n = reader.read_until(b'\n', &mut buff).await?;

            if n == 0 {
                break;
            }

            line_index.push(curr_offset);
            curr_offset += n as u64;
        }

        debug!(
            "indexed {} lines spanning {} bytes",
            line_index.len(),
            curr_offset
        );

        Ok(Self { inner: line_index })
    }

    /// Opens the file at `path` and builds its index.
    pub async fn build_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .await
            .map_err(|e| Error::from_open(e, path))?;

        Self::build(&mut BufReader::new(file)).await
    }

    /// Get the offset of the line `pos`
    #[inline]
    pub fn get(&self, pos: usize) -> Result<u64> {
        self.inner
            .get(pos)
            .copied()
            .ok_or(Error::LineIndexOutOfRange {
                line: pos,
                total: self.len(),
            })
    }

    /// Returns the amount of items of the index, which is the amount of lines in the file.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the indexed file had no lines
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.inner
    }

    /// Returns `true` if the index starts at 0 and never goes backwards
    pub fn is_monotonic(&self) -> bool {
        self.inner.first().map_or(true, |first| *first == 0)
            && self.inner.iter().tuple_windows().all(|(a, b)| a <= b)
    }
}

impl From<Vec<u64>> for Index {
    #[inline]
    fn from(lines: Vec<u64>) -> Self {
        Self::new(lines)
    }
}

#[cfg(test)]
mod tests {
    use async_std::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use super::*;

    async fn build_str(s: &str) -> Index {
        Index::build(&mut Cursor::new(s.as_bytes())).await.unwrap()
    }

    #[async_std::test]
    async fn test_build() {
        let index = build_str("I am line 0\nI am line 1\nI am line 2\n").await;
        assert_eq!(index.as_slice(), &[0, 12, 24]);
        assert_eq!(index.len(), 3);
        assert!(index.is_monotonic());
    }

    #[async_std::test]
    async fn test_empty() {
        let index = build_str("").await;
        assert!(index.is_empty());
        assert_eq!(index.as_slice(), &[] as &[u64]);
        assert!(index.get(0).unwrap_err().is_out_of_range());
    }

    #[async_std::test]
    async fn test_no_new_line() {
        let index = build_str("first\nsecond").await;
        assert_eq!(index.as_slice(), &[0, 6]);

        let index = build_str("single").await;
        assert_eq!(index.as_slice(), &[0]);
    }

    #[async_std::test]
    async fn test_empty_lines() {
        let index = build_str("l0\n\nl2\n").await;
        assert_eq!(index.as_slice(), &[0, 3, 4]);

        let index = build_str("\n\n").await;
        assert_eq!(index.as_slice(), &[0, 1]);
    }

    #[async_std::test]
    async fn test_multibyte() {
        let index = build_str("音楽好き\nthis is a text\n").await;
        assert_eq!(index.as_slice(), &[0, 13]);
    }

    #[async_std::test]
    async fn test_build_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a\nbb\nccc\n").unwrap();

        let first = Index::build_from_path(file.path()).await.unwrap();
        let second = Index::build_from_path(file.path()).await.unwrap();

        assert_eq!(first.as_slice(), &[0, 2, 5]);
        assert_eq!(first, second);
    }

    #[async_std::test]
    async fn test_build_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");

        let err = Index::build_from_path(&path).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_get() {
        let index = Index::new(vec![0, 5, 10]);
        assert_eq!(index.get(2).unwrap(), 10);

        match index.get(3) {
            Err(Error::LineIndexOutOfRange { line, total }) => {
                assert_eq!(line, 3);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_monotonic() {
        assert!(Index::new(vec![]).is_monotonic());
        assert!(Index::new(vec![0, 0, 4]).is_monotonic());
        assert!(!Index::new(vec![0, 5, 4]).is_monotonic());
        assert!(!Index::new(vec![1, 5]).is_monotonic());
    }
}
