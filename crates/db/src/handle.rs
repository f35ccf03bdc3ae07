//! Lazily connected store handle.
//!
//! The handle is created at startup without touching the database. The first
//! request that needs the store connects it; concurrent first callers wait on
//! the same pending connect. A failed connect leaves the handle unconnected so
//! a later request tries again.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::StoreError;
use crate::memory::MemoryEntryStore;
use crate::postgres::PgEntryStore;
use crate::store::EntryStore;

/// Which store implementation a [`StoreHandle`] connects to.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

pub struct StoreHandle {
    backend: Option<StoreBackend>,
    store: OnceCell<Arc<dyn EntryStore>>,
}

impl StoreHandle {
    /// A handle that connects to `backend` on first use.
    pub fn new(backend: StoreBackend) -> Self {
        Self {
            backend: Some(backend),
            store: OnceCell::new(),
        }
    }

    /// A handle around an already constructed store.
    pub fn with_store(store: Arc<dyn EntryStore>) -> Self {
        Self {
            backend: None,
            store: OnceCell::new_with(Some(store)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.initialized()
    }

    /// The connected store, connecting first if needed.
    pub async fn get(&self) -> Result<Arc<dyn EntryStore>, StoreError> {
        let store = self.store.get_or_try_init(|| self.connect()).await?;
        Ok(Arc::clone(store))
    }

    async fn connect(&self) -> Result<Arc<dyn EntryStore>, StoreError> {
        match &self.backend {
            Some(StoreBackend::Postgres {
                database_url,
                max_connections,
            }) => {
                let pool = crate::create_pool(database_url, *max_connections).await?;
                tracing::info!("Database connection pool created");

                crate::run_migrations(&pool).await?;
                tracing::info!("Database migrations applied");

                Ok(Arc::new(PgEntryStore::new(pool)))
            }
            Some(StoreBackend::Memory) => {
                tracing::warn!("Using in-memory entry store; data is lost on restart");
                Ok(Arc::new(MemoryEntryStore::new()))
            }
            None => Err(StoreError::NotConfigured(
                "no backend configured".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn connect_happens_once() {
        let handle = StoreHandle::new(StoreBackend::Memory);
        assert!(!handle.is_connected());

        let first = handle.get().await.unwrap();
        let second = handle.get().await.unwrap();

        assert!(handle.is_connected());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn concurrent_first_callers_share_one_store() {
        let handle = Arc::new(StoreHandle::new(StoreBackend::Memory));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                tokio::spawn(async move { handle.get().await.unwrap() })
            })
            .collect();

        let mut stores = Vec::new();
        for task in tasks {
            stores.push(task.await.unwrap());
        }
        assert!(stores.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn failed_connect_leaves_handle_unconnected() {
        let handle = StoreHandle::new(StoreBackend::Postgres {
            database_url: "not a database url".to_string(),
            max_connections: 1,
        });

        assert_matches!(handle.get().await.map(|_| ()), Err(StoreError::Database(_)));
        assert!(!handle.is_connected());
    }

    #[tokio::test]
    async fn provided_store_is_returned() {
        let store: Arc<dyn EntryStore> = Arc::new(MemoryEntryStore::new());
        let handle = StoreHandle::with_store(Arc::clone(&store));
        assert!(handle.is_connected());
        assert!(Arc::ptr_eq(&handle.get().await.unwrap(), &store));
    }
}
