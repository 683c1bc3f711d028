use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait, TransactionTrait};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::shared::error::{AppError, AppResult};

// =========================================================================
// SeaORM Implementation (Generic Base)
// =========================================================================

/// Repository over one entity, sharing the pooled connection.
pub struct SeaOrmRepository<E>
where
    E: EntityTrait,
{
    conn: Arc<DatabaseConnection>,
    _marker: PhantomData<E>,
}

impl<E> Clone for SeaOrmRepository<E>
where
    E: EntityTrait,
{
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E> SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        tracing::debug!("Creating SeaOrmRepository for {}", std::any::type_name::<E>());
        Self {
            conn: db,
            _marker: PhantomData,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        self.conn.as_ref()
    }

    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.conn.begin().await.map_err(AppError::DbError)
    }

    /// Commits on success and rolls back on failure, returning the outcome.
    pub async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::DbError)?;
                Ok(value)
            }
            Err(err) => {
                txn.rollback().await.map_err(AppError::DbError)?;
                Err(err)
            }
        }
    }
}
