use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use sha2::{Digest, Sha256};

use super::error::DataError;
use super::loader::load_bytes;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// DatasetCache – loaded datasets keyed by path and content hash
// ---------------------------------------------------------------------------

struct CacheEntry {
    digest: Vec<u8>,
    dataset: Arc<Dataset>,
}

/// Owner-held cache of parsed datasets.
///
/// An entry is reused only while the file's SHA-256 digest is unchanged, so a
/// rewritten file is reparsed on the next [`DatasetCache::get_or_load`].
/// Entries otherwise live until [`invalidate`](DatasetCache::invalidate) or
/// [`clear`](DatasetCache::clear).
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    /// Return the dataset at `path`, parsing it only when it is not cached or
    /// its content changed since it was cached.
    ///
    /// The file is read once; the digest and the parsed dataset both come
    /// from that buffer.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        let bytes = std::fs::read(path).map_err(|source| DataError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.get_or_parse(path, bytes)
    }

    fn get_or_parse(&mut self, path: &Path, bytes: Vec<u8>) -> Result<Arc<Dataset>> {
        let key = cache_key(path);
        let digest = Sha256::digest(&bytes).to_vec();

        if let Some(entry) = self.entries.get(&key) {
            if entry.digest == digest {
                log::debug!("dataset cache hit for {}", key.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            log::debug!("content of {} changed, reloading", key.display());
        } else {
            log::debug!("dataset cache miss for {}", key.display());
        }

        let dataset = Arc::new(load_bytes(path, bytes)?);
        self.entries.insert(
            key,
            CacheEntry {
                digest,
                dataset: Arc::clone(&dataset),
            },
        );
        log::debug!("dataset cache holds {} entries", self.len());
        Ok(dataset)
    }

    /// Drop the entry for `path`. Returns whether one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&cache_key(path)).is_some()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical path when it resolves, the path as given otherwise.
fn cache_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "sex,pclass,embark_town,age,fare,family_size,survived\n";

    fn csv_text(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    fn write_csv(path: &Path, rows: &[&str]) {
        std::fs::write(path, csv_text(rows)).expect("write csv");
    }

    const ONE: &[&str] = &["male,3,Southampton,22,7.25,2,0"];
    const TWO: &[&str] = &["male,3,Southampton,22,7.25,2,0", "female,1,Cherbourg,38,71.28,2,1"];

    #[test]
    fn unchanged_file_is_served_from_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("titanic.csv");
        write_csv(&path, &["male,3,Southampton,22,7.25,2,0"]);

        let mut cache = DatasetCache::default();
        let first = cache.get_or_load(&path).expect("first load");
        let second = cache.get_or_load(&path).expect("second load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn rewritten_file_is_reloaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("titanic.csv");
        write_csv(&path, &["male,3,Southampton,22,7.25,2,0"]);

        let mut cache = DatasetCache::default();
        let first = cache.get_or_load(&path).expect("first load");
        write_csv(
            &path,
            &["male,3,Southampton,22,7.25,2,0", "female,1,Cherbourg,38,71.28,2,1"],
        );
        let second = cache.get_or_load(&path).expect("reload");

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_and_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_csv(&a, &["male,3,Southampton,22,7.25,2,0"]);
        write_csv(&b, &["female,1,Cherbourg,38,71.28,2,1"]);

        let mut cache = DatasetCache::default();
        let before = cache.get_or_load(&a).expect("load a");
        cache.get_or_load(&b).expect("load b");
        assert_eq!(cache.len(), 2);

        assert!(cache.invalidate(&a));
        assert!(!cache.invalidate(&a));
        let after = cache.get_or_load(&a).expect("reload a");
        assert!(!Arc::ptr_eq(&before, &after));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn missing_file_is_not_cached() {
        let mut cache = DatasetCache::default();
        assert!(cache.get_or_load(Path::new("nowhere/titanic.csv")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn cached_dataset_is_parsed_from_the_hashed_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("titanic.csv");
        // The file on disk differs from the content handed to the cache.
        write_csv(&path, TWO);

        let mut cache = DatasetCache::default();
        let parsed = cache
            .get_or_parse(&path, csv_text(ONE).into_bytes())
            .expect("parse buffer");
        assert_eq!(parsed.len(), 1);

        write_csv(&path, ONE);
        let served = cache.get_or_load(&path).expect("load");
        assert!(Arc::ptr_eq(&parsed, &served));
        assert_eq!(served.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn content_changing_between_opens_never_mismatches() {
        use std::sync::mpsc;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("titanic.csv");
        let status = std::process::Command::new("mkfifo")
            .arg(&path)
            .status()
            .expect("run mkfifo");
        assert!(status.success());

        // Each open of the FIFO sees the next content in turn.
        let served = [csv_text(ONE), csv_text(TWO), csv_text(ONE)];
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let writer_path = path.clone();
        let writer = std::thread::spawn(move || {
            for text in served {
                std::fs::write(&writer_path, text).expect("write fifo");
                if done_rx.recv().is_err() {
                    return;
                }
            }
        });

        let mut cache = DatasetCache::default();
        for expected in [1, 2, 1] {
            let ds = cache.get_or_load(&path).expect("load from fifo");
            assert_eq!(ds.len(), expected);
            done_tx.send(()).expect("signal writer");
        }
        writer.join().expect("writer thread");
    }
}
