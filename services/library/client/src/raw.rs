use sea_orm::{ConnectionTrait, DbBackend, FromQueryResult, Statement, Value};
use serde_json::Value as JsonValue;

use crate::error::DataError;

/// Hand-written SQL against the same connection as the delegates.
///
/// The parameterized methods bind `values` to `$1..$n`; the `_unsafe` ones
/// send the text as-is and must never see untrusted input.
pub struct Raw<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> Raw<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    fn statement(&self, sql: &str, values: Vec<Value>) -> Statement {
        parameterized(self.conn.get_database_backend(), sql, values)
    }

    pub async fn query_raw(
        &self,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Vec<JsonValue>, DataError> {
        let statement = self.statement(sql, values);
        Ok(JsonValue::find_by_statement(statement).all(self.conn).await?)
    }

    pub async fn query_raw_as<T>(
        &self,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Vec<T>, DataError>
    where
        T: FromQueryResult + Send,
    {
        let statement = self.statement(sql, values);
        Ok(T::find_by_statement(statement).all(self.conn).await?)
    }

    pub async fn execute_raw(&self, sql: &str, values: Vec<Value>) -> Result<u64, DataError> {
        let statement = self.statement(sql, values);
        Ok(self.conn.execute(statement).await?.rows_affected())
    }

    pub async fn query_raw_unsafe(&self, sql: &str) -> Result<Vec<JsonValue>, DataError> {
        let statement = Statement::from_string(self.conn.get_database_backend(), sql);
        Ok(JsonValue::find_by_statement(statement).all(self.conn).await?)
    }

    pub async fn execute_raw_unsafe(&self, sql: &str) -> Result<u64, DataError> {
        Ok(self.conn.execute_unprepared(sql).await?.rows_affected())
    }
}

pub fn parameterized(backend: DbBackend, sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(backend, sql, values)
}
