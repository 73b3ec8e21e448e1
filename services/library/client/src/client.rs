use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction};

use lectern_library_schema::{
    admin_events, annotations, banners, categories, ebooks, reading_logs, reading_progress,
    readlists, subscriptions, transactions, users,
};

use crate::delegate::Delegate;
use crate::error::DataError;
use crate::raw::Raw;

/// Per-model delegates and raw access over some connection.
///
/// Implemented by the pooled [`LibraryClient`] and by the [`TxClient`] handed
/// to interactive transaction callbacks.
pub trait ModelAccess {
    type Conn: ConnectionTrait;

    fn conn(&self) -> &Self::Conn;

    fn user(&self) -> Delegate<'_, users::Entity, Self::Conn> {
        Delegate::new(self.conn(), "User")
    }

    fn subscription(&self) -> Delegate<'_, subscriptions::Entity, Self::Conn> {
        Delegate::new(self.conn(), "Subscription")
    }

    fn transaction(&self) -> Delegate<'_, transactions::Entity, Self::Conn> {
        Delegate::new(self.conn(), "Transaction")
    }

    fn ebook(&self) -> Delegate<'_, ebooks::Entity, Self::Conn> {
        Delegate::new(self.conn(), "Ebook")
    }

    fn category(&self) -> Delegate<'_, categories::Entity, Self::Conn> {
        Delegate::new(self.conn(), "Category")
    }

    fn banner(&self) -> Delegate<'_, banners::Entity, Self::Conn> {
        Delegate::new(self.conn(), "Banner")
    }

    fn reading_log(&self) -> Delegate<'_, reading_logs::Entity, Self::Conn> {
        Delegate::new(self.conn(), "ReadingLog")
    }

    fn admin_event(&self) -> Delegate<'_, admin_events::Entity, Self::Conn> {
        Delegate::new(self.conn(), "AdminEvent")
    }

    fn reading_progress(&self) -> Delegate<'_, reading_progress::Entity, Self::Conn> {
        Delegate::new(self.conn(), "ReadingProgress")
    }

    fn annotation(&self) -> Delegate<'_, annotations::Entity, Self::Conn> {
        Delegate::new(self.conn(), "Annotation")
    }

    fn readlist(&self) -> Delegate<'_, readlists::Entity, Self::Conn> {
        Delegate::new(self.conn(), "Readlist")
    }

    fn raw(&self) -> Raw<'_, Self::Conn> {
        Raw::new(self.conn())
    }
}

// ── Pooled client ────────────────────────────────────────────────────────────

/// Entry point of the data layer, wrapping the connection pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone, Debug)]
pub struct LibraryClient {
    db: DatabaseConnection,
}

impl LibraryClient {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn connect(options: impl Into<ConnectOptions>) -> Result<Self, DataError> {
        let db = Database::connect(options).await?;
        Ok(Self { db })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn ping(&self) -> Result<(), DataError> {
        self.db.ping().await.map_err(DataError::from)
    }
}

impl From<DatabaseConnection> for LibraryClient {
    fn from(db: DatabaseConnection) -> Self {
        Self::new(db)
    }
}

impl ModelAccess for LibraryClient {
    type Conn = DatabaseConnection;

    fn conn(&self) -> &DatabaseConnection {
        &self.db
    }
}

// ── Transaction-scoped client ────────────────────────────────────────────────

/// Client bound to one open transaction.
///
/// Only reachable through `LibraryClient::with_transaction`; it has no
/// commit, rollback or nested transaction methods of its own.
#[derive(Debug)]
pub struct TxClient {
    pub(crate) txn: DatabaseTransaction,
}

impl ModelAccess for TxClient {
    type Conn = DatabaseTransaction;

    fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }
}
