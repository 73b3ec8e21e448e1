use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, LoaderTrait, PaginatorTrait, PrimaryKeyTrait, QueryFilter, QuerySelect,
    Related,
    sea_query::{OnConflict, SimpleExpr},
};
use serde_json::Value as JsonValue;

use crate::aggregate::{AggregateArgs, AggregateRow, GroupByArgs};
use crate::args::FindArgs;
use crate::error::DataError;

type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Operation set of one model over one connection.
///
/// `C` is either the pooled connection or an open transaction, so the same
/// delegate code runs inside and outside `LibraryClient::with_transaction`.
pub struct Delegate<'c, E, C> {
    conn: &'c C,
    model: &'static str,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E, C> Delegate<'c, E, C>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C, model: &'static str) -> Self {
        Self {
            conn,
            model,
            _entity: PhantomData,
        }
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    fn fail(&self, err: DbErr) -> DataError {
        DataError::from_db(self.model, err)
    }

    fn not_found(&self) -> DataError {
        DataError::NotFound { model: self.model }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub async fn find_unique<K>(&self, id: K) -> Result<Option<E::Model>, DataError>
    where
        K: Into<PrimaryKeyOf<E>>,
    {
        E::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(|e| self.fail(e))
    }

    pub async fn find_unique_or_throw<K>(&self, id: K) -> Result<E::Model, DataError>
    where
        K: Into<PrimaryKeyOf<E>>,
    {
        self.find_unique(id).await?.ok_or_else(|| self.not_found())
    }

    pub async fn find_first(&self, args: FindArgs<E>) -> Result<Option<E::Model>, DataError> {
        args.into_select()
            .one(self.conn)
            .await
            .map_err(|e| self.fail(e))
    }

    pub async fn find_first_or_throw(&self, args: FindArgs<E>) -> Result<E::Model, DataError> {
        self.find_first(args).await?.ok_or_else(|| self.not_found())
    }

    pub async fn find_many(&self, args: FindArgs<E>) -> Result<Vec<E::Model>, DataError> {
        args.into_select()
            .all(self.conn)
            .await
            .map_err(|e| self.fail(e))
    }

    /// Projects only `columns`, one JSON object per row keyed by column name.
    pub async fn find_many_select(
        &self,
        args: FindArgs<E>,
        columns: &[E::Column],
    ) -> Result<Vec<JsonValue>, DataError> {
        if columns.is_empty() {
            return Err(DataError::Validation(format!(
                "{} select requires at least one column",
                self.model
            )));
        }
        args.into_select()
            .select_only()
            .columns(columns.iter().copied())
            .into_json()
            .all(self.conn)
            .await
            .map_err(|e| self.fail(e))
    }

    /// Loads the has-many relation `R` for every matched row.
    pub async fn find_many_with_related<R>(
        &self,
        args: FindArgs<E>,
        related: R,
    ) -> Result<Vec<(E::Model, Vec<R::Model>)>, DataError>
    where
        R: EntityTrait,
        R::Model: Send + Sync,
        E: Related<R>,
    {
        let models = self.find_many(args).await?;
        let children = models
            .load_many(related, self.conn)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(models.into_iter().zip(children).collect())
    }

    /// Loads the belongs-to relation `R` for every matched row.
    pub async fn find_many_with_parent<R>(
        &self,
        args: FindArgs<E>,
        parent: R,
    ) -> Result<Vec<(E::Model, Option<R::Model>)>, DataError>
    where
        R: EntityTrait,
        R::Model: Send + Sync,
        E: Related<R>,
    {
        let models = self.find_many(args).await?;
        let parents = models
            .load_one(parent, self.conn)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(models.into_iter().zip(parents).collect())
    }

    pub async fn count(&self, filter: Condition) -> Result<u64, DataError> {
        E::find()
            .filter(filter)
            .count(self.conn)
            .await
            .map_err(|e| self.fail(e))
    }

    pub async fn aggregate(&self, args: AggregateArgs<E>) -> Result<AggregateRow, DataError> {
        if args.is_empty() {
            return Err(DataError::Validation(format!(
                "{} aggregate requires at least one aggregate",
                self.model
            )));
        }
        let row = args
            .into_select()
            .into_json()
            .one(self.conn)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(row.map(AggregateRow::from_json).unwrap_or_default())
    }

    pub async fn group_by(&self, args: GroupByArgs<E>) -> Result<Vec<AggregateRow>, DataError> {
        if !args.has_keys() {
            return Err(DataError::Validation(format!(
                "{} group_by requires at least one key",
                self.model
            )));
        }
        let rows = args
            .into_select()
            .into_json()
            .all(self.conn)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(rows.into_iter().map(AggregateRow::from_json).collect())
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    pub async fn create<A>(&self, model: A) -> Result<E::Model, DataError>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(self.conn).await.map_err(|e| self.fail(e))
    }

    /// Inserts `models` in one statement and returns how many rows were
    /// written. Conflicting rows are skipped instead of failing when
    /// `skip_duplicates` is set.
    pub async fn create_many<A>(
        &self,
        models: Vec<A>,
        skip_duplicates: bool,
    ) -> Result<u64, DataError>
    where
        A: ActiveModelTrait<Entity = E> + Send,
        E::Model: IntoActiveModel<A>,
    {
        if models.is_empty() {
            return Ok(0);
        }
        let mut insert = E::insert_many(models);
        if skip_duplicates {
            insert = insert.on_conflict(OnConflict::new().do_nothing().to_owned());
        }
        insert
            .exec_without_returning(self.conn)
            .await
            .map_err(|e| self.fail(e))
    }

    /// Updates the row identified by the active model's primary key.
    pub async fn update<A>(&self, model: A) -> Result<E::Model, DataError>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.update(self.conn).await.map_err(|e| self.fail(e))
    }

    pub async fn update_many(
        &self,
        filter: Condition,
        values: Vec<(E::Column, SimpleExpr)>,
    ) -> Result<u64, DataError> {
        if values.is_empty() {
            return Err(DataError::Validation(format!(
                "{} update_many requires at least one column",
                self.model
            )));
        }
        let mut update = E::update_many().filter(filter);
        for (column, value) in values {
            update = update.col_expr(column, value);
        }
        let result = update.exec(self.conn).await.map_err(|e| self.fail(e))?;
        Ok(result.rows_affected)
    }

    /// Inserts `model`, or on a `conflict` hit updates `update` columns of the
    /// existing row. Returns the stored row either way.
    pub async fn upsert<A>(
        &self,
        model: A,
        conflict: &[E::Column],
        update: &[E::Column],
    ) -> Result<E::Model, DataError>
    where
        A: ActiveModelTrait<Entity = E> + Send,
        E::Model: IntoActiveModel<A>,
    {
        if conflict.is_empty() || update.is_empty() {
            return Err(DataError::Validation(format!(
                "{} upsert requires conflict and update columns",
                self.model
            )));
        }
        let on_conflict = OnConflict::columns(conflict.iter().copied())
            .update_columns(update.iter().copied())
            .to_owned();
        E::insert(model)
            .on_conflict(on_conflict)
            .exec_with_returning(self.conn)
            .await
            .map_err(|e| self.fail(e))
    }

    /// Deletes the row with primary key `id` and returns it.
    pub async fn delete<K>(&self, id: K) -> Result<E::Model, DataError>
    where
        K: Into<PrimaryKeyOf<E>> + Clone,
    {
        let model = self.find_unique_or_throw(id.clone()).await?;
        let result = E::delete_by_id(id)
            .exec(self.conn)
            .await
            .map_err(|e| self.fail(e))?;
        if result.rows_affected == 0 {
            return Err(self.not_found());
        }
        Ok(model)
    }

    pub async fn delete_many(&self, filter: Condition) -> Result<u64, DataError> {
        let result = E::delete_many()
            .filter(filter)
            .exec(self.conn)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(result.rows_affected)
    }
}
