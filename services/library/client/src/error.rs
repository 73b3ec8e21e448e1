use sea_orm::{DbErr, SqlErr};

/// Failure of a facade operation, classified from the underlying `DbErr`.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("no {model} record found")]
    NotFound { model: &'static str },

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("invalid query input: {0}")]
    Validation(String),

    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("{0} timed out")]
    Timeout(&'static str),

    #[error("database error")]
    Database(#[source] DbErr),
}

impl DataError {
    /// Classify `err` raised while operating on `model`.
    pub fn from_db(model: &'static str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                return Self::UniqueViolation(detail);
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                return Self::ForeignKeyViolation(detail);
            }
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => Self::NotFound { model },
            DbErr::Conn(e) => Self::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => Self::Connection(e.to_string()),
            DbErr::AttrNotSet(attr) => Self::Validation(format!("attribute `{attr}` is not set")),
            other => Self::Database(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<DbErr> for DataError {
    fn from(err: DbErr) -> Self {
        Self::from_db("record", err)
    }
}
