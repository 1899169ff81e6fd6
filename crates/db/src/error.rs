use skilldrill_core::error::CoreError;

/// Error for repository operations that run domain rules inside a
/// transaction: either the database failed or a rule rejected the change.
/// In both cases the transaction has been rolled back.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}
