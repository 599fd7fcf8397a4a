//! Process-wide genre id → name cache.

use super::GenreMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Lazily populated genre table shared by every [`super::MovieCatalog`] that holds it.
///
/// Empty means "not loaded yet" (or the last load failed). Once a non-empty
/// table is stored it is kept for the rest of the process; concurrent first
/// loads may both store, and whichever write lands last wins.
#[derive(Debug, Default)]
pub struct GenreCache {
    genres: RwLock<Arc<GenreMap>>,
}

impl GenreCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table, or `None` if nothing has been loaded.
    pub async fn get(&self) -> Option<Arc<GenreMap>> {
        let genres = self.genres.read().await;
        (!genres.is_empty()).then(|| Arc::clone(&genres))
    }

    /// Memoizes a freshly fetched table. Empty tables are ignored.
    pub async fn store(&self, genres: GenreMap) -> Arc<GenreMap> {
        let genres = Arc::new(genres);
        if !genres.is_empty() {
            *self.genres.write().await = Arc::clone(&genres);
        }
        genres
    }

    /// Forgets the cached table. Intended for tests.
    pub async fn reset(&self) {
        *self.genres.write().await = Arc::new(GenreMap::new());
    }
}
