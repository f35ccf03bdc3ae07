/// Errors raised by an [`EntryStore`](crate::store::EntryStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unsupported orderBy field '{0}'. Must be one of: _id, id, clue, answer")]
    UnsupportedOrderField(String),

    #[error("Requested page is out of range")]
    PageOutOfRange,

    #[error("Entry store is not configured: {0}")]
    NotConfigured(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Whether the message is safe to show to API callers.
    ///
    /// Database and migration errors can carry connection details and are
    /// only logged.
    pub fn is_caller_facing(&self) -> bool {
        matches!(
            self,
            StoreError::UnsupportedOrderField(_) | StoreError::PageOutOfRange
        )
    }
}
