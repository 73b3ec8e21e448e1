use std::time::Duration;

use futures::future::BoxFuture;
use sea_orm::{AccessMode, ConnectionTrait, IsolationLevel, Statement, TransactionTrait};

use crate::client::{LibraryClient, TxClient};
use crate::error::DataError;

/// Bounds of an interactive or batch transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionOptions {
    /// `None` keeps the database default.
    pub isolation_level: Option<IsolationLevel>,
    pub access_mode: Option<AccessMode>,
    /// Longest wait for a pooled connection and `BEGIN`.
    pub max_wait: Duration,
    /// Longest run time of the callback before rolling back.
    pub timeout: Duration,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            isolation_level: None,
            access_mode: None,
            max_wait: Duration::from_secs(2),
            timeout: Duration::from_secs(5),
        }
    }
}

impl TransactionOptions {
    pub fn isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = Some(level);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.access_mode = Some(AccessMode::ReadOnly);
        self
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl LibraryClient {
    /// Runs `callback` inside one database transaction.
    ///
    /// Commits when the callback returns `Ok`; rolls back when it returns
    /// `Err` or exceeds `options.timeout`.
    pub async fn with_transaction<F, T, E>(
        &self,
        options: TransactionOptions,
        callback: F,
    ) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c TxClient) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<DataError> + Send,
    {
        let begin = self
            .connection()
            .begin_with_config(options.isolation_level, options.access_mode);
        let txn = match tokio::time::timeout(options.max_wait, begin).await {
            Ok(txn) => txn.map_err(DataError::from)?,
            Err(_) => {
                tracing::warn!(max_wait = ?options.max_wait, "timed out starting transaction");
                return Err(DataError::Timeout("transaction start").into());
            }
        };

        let tx = TxClient { txn };
        let outcome = tokio::time::timeout(options.timeout, callback(&tx)).await;
        let TxClient { txn } = tx;

        match outcome {
            Ok(Ok(value)) => {
                txn.commit().await.map_err(DataError::from)?;
                Ok(value)
            }
            Ok(Err(err)) => {
                if let Err(e) = txn.rollback().await {
                    tracing::warn!(error = %e, "rollback failed");
                }
                Err(err)
            }
            Err(_) => {
                tracing::warn!(timeout = ?options.timeout, "transaction timed out, rolling back");
                if let Err(e) = txn.rollback().await {
                    tracing::warn!(error = %e, "rollback failed");
                }
                Err(DataError::Timeout("transaction").into())
            }
        }
    }

    /// Executes `statements` in order inside one transaction and returns the
    /// affected row count of each. Any failure rolls back all of them.
    pub async fn batch(
        &self,
        options: TransactionOptions,
        statements: Vec<Statement>,
    ) -> Result<Vec<u64>, DataError> {
        self.with_transaction(options, move |tx| {
            Box::pin(async move {
                let mut affected = Vec::with_capacity(statements.len());
                for statement in statements {
                    let result = tx.txn.execute(statement).await?;
                    affected.push(result.rows_affected());
                }
                Ok::<_, DataError>(affected)
            })
        })
        .await
    }
}
