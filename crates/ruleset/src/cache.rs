//! Process-wide caches for compiled patterns.
//!
//! Rule sets are usually applied many times with the same `matches`
//! patterns and `date` formats, so compiled forms are memoized by their
//! source text. Failed compilations are not cached.

use std::sync::Arc;

use moka::sync::Cache;

/// Bounded, thread-safe memo of compiled artefacts keyed by source text.
pub(crate) struct CompileCache<T> {
    inner: Cache<String, Arc<T>>,
}

impl<T> CompileCache<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a cache holding at most `capacity` entries.
    pub(crate) fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the cached artefact for `source`, compiling it on a miss.
    pub(crate) fn get_or_compile<E>(
        &self,
        source: &str,
        compile: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if let Some(hit) = self.inner.get(source) {
            return Ok(hit);
        }
        let compiled = Arc::new(compile(source)?);
        self.inner.insert(source.to_owned(), Arc::clone(&compiled));
        Ok(compiled)
    }
}
