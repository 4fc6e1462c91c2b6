use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::DataError;

use super::loader::load_file;
use super::model::Movies;

// ---------------------------------------------------------------------------
// Process-scoped dataset cache
// ---------------------------------------------------------------------------

/// Holds at most one loaded table, keyed by its path.
///
/// Filled on first access and kept until [`DatasetCache::invalidate`] or
/// process exit. The table itself is read-only once shared.
pub struct DatasetCache {
    slot: Mutex<Option<(PathBuf, Arc<Movies>)>>,
}

static GLOBAL: DatasetCache = DatasetCache::new();

/// The process-wide cache used by the dashboard.
pub fn global() -> &'static DatasetCache {
    &GLOBAL
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<(PathBuf, Arc<Movies>)>> {
        // The slot is only ever replaced whole; a poisoned guard is still consistent.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached table for `path`, reading the file only on a miss.
    ///
    /// A different path replaces the cached table. A failed load leaves the
    /// previous entry untouched.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Movies>, DataError> {
        let mut slot = self.lock();
        if let Some((cached_path, movies)) = slot.as_ref() {
            if cached_path == path {
                log::debug!("Dataset cache hit for {}", path.display());
                return Ok(Arc::clone(movies));
            }
        }

        log::debug!("Dataset cache miss for {}", path.display());
        let movies = Arc::new(load_file(path)?);
        *slot = Some((path.to_path_buf(), Arc::clone(&movies)));
        Ok(movies)
    }

    /// Drop the cached table so the next access re-reads the file.
    pub fn invalidate(&self) {
        if let Some((path, _)) = self.lock().take() {
            log::info!("Dataset cache cleared ({})", path.display());
        }
    }

    /// Whether a table is currently cached.
    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "Title,Genre,Release_Year,Vote_Average,Popularity\n";

    fn csv_file(rows: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{HEADER}{rows}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn second_access_does_not_reread_the_file() {
        let cache = DatasetCache::new();
        let file = csv_file("A,\"['Drama']\",2015,7.5,50\n");
        let path = file.path().to_path_buf();

        let first = cache.get_or_load(&path).unwrap();
        drop(file);
        assert!(!path.exists());

        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let cache = DatasetCache::new();
        let file = csv_file("A,\"['Drama']\",2015,7.5,50\n");
        let path = file.path().to_path_buf();

        cache.get_or_load(&path).unwrap();
        assert!(cache.is_loaded());

        cache.invalidate();
        assert!(!cache.is_loaded());

        drop(file);
        assert!(matches!(
            cache.get_or_load(&path),
            Err(DataError::Unavailable { .. })
        ));
    }

    #[test]
    fn new_path_replaces_entry_and_failures_keep_it() {
        let cache = DatasetCache::new();
        let a = csv_file("A,\"['Drama']\",2015,7.5,50\n");
        let b = csv_file("B,\"['Comedy']\",2016,6.5,20\nC,\"['War']\",2017,5.0,2\n");

        assert_eq!(cache.get_or_load(a.path()).unwrap().len(), 1);
        let loaded_b = cache.get_or_load(b.path()).unwrap();
        assert_eq!(loaded_b.len(), 2);

        assert!(cache.get_or_load(Path::new("/missing/movies.csv")).is_err());
        let still_b = cache.get_or_load(b.path()).unwrap();
        assert!(Arc::ptr_eq(&loaded_b, &still_b));
    }
}
