use std::{
    io::SeekFrom,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, OnceLock,
    },
    time::Instant,
};

use async_std::{
    fs,
    io::{prelude::*, BufReader},
    sync::Mutex,
};
use async_trait::async_trait;
use log::{debug, info};

use crate::{error::Error, index::Index, ReadLine, Result};

/// Lifecycle of the index held by an `IndexedReader`. `Ready` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Uninitialized,
    Building,
    Ready,
}

/// Reads lines of a file by seeking to the offsets of its index. The index gets built on the
/// first lookup, or can be passed in if it was built beforehand.
///
/// The reader can be shared between tasks. Concurrent first lookups wait for a single build
/// instead of each scanning the file.
#[derive(Debug)]
pub struct IndexedReader {
    path: PathBuf,
    index: OnceLock<Arc<Index>>,
    // Held for the whole duration of a build
    build_lock: Mutex<()>,
    builds: AtomicUsize,
}

impl IndexedReader {
    /// Create a new reader for `path`. The file isn't touched until the first lookup.
    pub fn new<P: Into<PathBuf>>(path: P) -> IndexedReader {
        Self {
            path: path.into(),
            index: OnceLock::new(),
            build_lock: Mutex::new(()),
            builds: AtomicUsize::new(0),
        }
    }

    /// Create a new reader using a prebuilt `index`, which can be shared with other readers of
    /// the same file. Expects the index to be properly built.
    pub fn with_index<P: Into<PathBuf>>(path: P, index: Arc<Index>) -> IndexedReader {
        let reader = Self::new(path);
        // Freshly created, so the cell is always empty
        let _ = reader.index.set(index);
        reader
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> IndexState {
        if self.index.get().is_some() {
            return IndexState::Ready;
        }

        match self.build_lock.try_lock() {
            // The build might have finished between both checks
            Some(_guard) if self.index.get().is_some() => IndexState::Ready,
            Some(_guard) => IndexState::Uninitialized,
            None => IndexState::Building,
        }
    }

    /// Returns how often this reader attempted to build its index, including builds that failed
    /// because the file couldn't be opened.
    #[inline]
    pub fn index_builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Returns the index, building it if this hasn't happened yet. A failed build leaves the
    /// reader uninitialized so the next lookup tries again.
    pub async fn index(&self) -> Result<Arc<Index>> {
        if let Some(index) = self.index.get() {
            return Ok(Arc::clone(index));
        }

        let _guard = self.build_lock.lock().await;

        // Someone else built it while we were waiting for the lock
        if let Some(index) = self.index.get() {
            return Ok(Arc::clone(index));
        }

        self.builds.fetch_add(1, Ordering::SeqCst);
        let start = Instant::now();
        let index = Arc::new(Index::build_from_path(&self.path).await?);

        info!(
            "indexed {} lines of {} in {:?}",
            index.len(),
            self.path.display(),
            start.elapsed()
        );

        // Only set while holding the build lock, so this can't be occupied already
        let _ = self.index.set(Arc::clone(&index));
        Ok(index)
    }

    /// Reads from `offset` until the next `\n` or the end of the file
    async fn read_at(&self, offset: u64) -> Result<Vec<u8>> {
        let file = fs::File::open(&self.path)
            .await
            .map_err(|e| Error::from_open(e, &self.path))?;
        let mut reader = BufReader::new(file);

        reader.seek(SeekFrom::Start(offset)).await?;

        let mut buf = Vec::new();
        reader.read_until(b'\n', &mut buf).await?;
        Ok(buf)
    }
}

#[async_trait]
impl ReadLine for IndexedReader {
    async fn read_line_raw(&self, line: usize) -> Result<Vec<u8>> {
        let offset = self.index().await?.get(line)?;
        debug!("reading line {} at offset {}", line, offset);
        self.read_at(offset).await
    }

    async fn line_count(&self) -> Result<usize> {
        Ok(self.index().await?.len())
    }

    async fn prepare(&self) -> Result<()> {
        self.index().await.map(|_| ())
    }
}
