//! Aggregation and grouping arguments.
//!
//! Aggregates are projected under stable aliases so results can be read back
//! from a JSON row: `_count`, `_sum_<column>`, `_avg_<column>`,
//! `_min_<column>` and `_max_<column>`. Sums and averages are cast to
//! `DOUBLE PRECISION` so integer and float columns decode alike.

use sea_orm::{
    Condition, EntityTrait, IdenStatic, IntoSimpleExpr, Order, QueryFilter, QueryOrder,
    QuerySelect, Select,
    sea_query::{Expr, IntoCondition, SimpleExpr},
};
use serde_json::{Map, Value as JsonValue};

pub const COUNT_ALIAS: &str = "_count";

fn alias(prefix: &str, column: &impl IdenStatic) -> String {
    format!("_{prefix}_{}", column.as_str())
}

fn count_expr() -> SimpleExpr {
    Expr::cust("COUNT(*)")
}

fn float_expr(func: &str, column: &impl IdenStatic) -> SimpleExpr {
    Expr::cust(format!(
        r#"CAST({func}("{}") AS DOUBLE PRECISION)"#,
        column.as_str()
    ))
}

// ── Selection ────────────────────────────────────────────────────────────────

struct Selection<E: EntityTrait> {
    count: bool,
    sum: Vec<E::Column>,
    avg: Vec<E::Column>,
    min: Vec<E::Column>,
    max: Vec<E::Column>,
}

impl<E: EntityTrait> Default for Selection<E> {
    fn default() -> Self {
        Self {
            count: false,
            sum: Vec::new(),
            avg: Vec::new(),
            min: Vec::new(),
            max: Vec::new(),
        }
    }
}

impl<E: EntityTrait> Selection<E> {
    fn is_empty(&self) -> bool {
        !self.count
            && self.sum.is_empty()
            && self.avg.is_empty()
            && self.min.is_empty()
            && self.max.is_empty()
    }

    fn apply(self, mut select: Select<E>) -> Select<E> {
        if self.count {
            select = select.column_as(count_expr(), COUNT_ALIAS);
        }
        for column in self.sum {
            select = select.column_as(float_expr("SUM", &column), alias("sum", &column));
        }
        for column in self.avg {
            select = select.column_as(float_expr("AVG", &column), alias("avg", &column));
        }
        for column in self.min {
            let expr = Expr::expr(column.into_simple_expr()).min();
            select = select.column_as(expr, alias("min", &column));
        }
        for column in self.max {
            let expr = Expr::expr(column.into_simple_expr()).max();
            select = select.column_as(expr, alias("max", &column));
        }
        select
    }
}

// ── Aggregate ────────────────────────────────────────────────────────────────

/// Arguments of `aggregate`: a filter and the aggregates to compute.
pub struct AggregateArgs<E: EntityTrait> {
    filter: Condition,
    selection: Selection<E>,
}

impl<E: EntityTrait> Default for AggregateArgs<E> {
    fn default() -> Self {
        Self {
            filter: Condition::all(),
            selection: Selection::default(),
        }
    }
}

impl<E: EntityTrait> AggregateArgs<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.filter = self.filter.add(condition.into_condition());
        self
    }

    pub fn count(mut self) -> Self {
        self.selection.count = true;
        self
    }

    pub fn sum(mut self, column: E::Column) -> Self {
        self.selection.sum.push(column);
        self
    }

    pub fn avg(mut self, column: E::Column) -> Self {
        self.selection.avg.push(column);
        self
    }

    pub fn min(mut self, column: E::Column) -> Self {
        self.selection.min.push(column);
        self
    }

    pub fn max(mut self, column: E::Column) -> Self {
        self.selection.max.push(column);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn into_select(self) -> Select<E> {
        let select = E::find().select_only().filter(self.filter);
        self.selection.apply(select)
    }
}

// ── Group by ─────────────────────────────────────────────────────────────────

/// Arguments of `group_by`: group keys, filter, having, aggregates, ordering
/// and window.
pub struct GroupByArgs<E: EntityTrait> {
    by: Vec<E::Column>,
    filter: Condition,
    having: Condition,
    selection: Selection<E>,
    order_by: Vec<(SimpleExpr, Order)>,
    skip: Option<u64>,
    take: Option<u64>,
}

impl<E: EntityTrait> GroupByArgs<E> {
    pub fn new(by: impl IntoIterator<Item = E::Column>) -> Self {
        Self {
            by: by.into_iter().collect(),
            filter: Condition::all(),
            having: Condition::all(),
            selection: Selection::default(),
            order_by: Vec::new(),
            skip: None,
            take: None,
        }
    }

    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.filter = self.filter.add(condition.into_condition());
        self
    }

    /// AND `condition` into the HAVING clause.
    pub fn having<F: IntoCondition>(mut self, condition: F) -> Self {
        self.having = self.having.add(condition.into_condition());
        self
    }

    pub fn count(mut self) -> Self {
        self.selection.count = true;
        self
    }

    pub fn sum(mut self, column: E::Column) -> Self {
        self.selection.sum.push(column);
        self
    }

    pub fn avg(mut self, column: E::Column) -> Self {
        self.selection.avg.push(column);
        self
    }

    pub fn min(mut self, column: E::Column) -> Self {
        self.selection.min.push(column);
        self
    }

    pub fn max(mut self, column: E::Column) -> Self {
        self.selection.max.push(column);
        self
    }

    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.order_by.push((column.into_simple_expr(), order));
        self
    }

    pub fn order_by_count(mut self, order: Order) -> Self {
        self.order_by.push((count_expr(), order));
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn has_keys(&self) -> bool {
        !self.by.is_empty()
    }

    pub fn into_select(self) -> Select<E> {
        let mut select = E::find().select_only().filter(self.filter);
        for column in &self.by {
            select = select.column(*column).group_by(*column);
        }
        select = self.selection.apply(select);
        if !self.having.is_empty() {
            select = select.having(self.having);
        }
        for (expr, order) in self.order_by {
            select = select.order_by(expr, order);
        }
        if let Some(skip) = self.skip {
            select = select.offset(skip);
        }
        if let Some(take) = self.take {
            select = select.limit(take);
        }
        select
    }
}

// ── Result rows ──────────────────────────────────────────────────────────────

/// One row of an `aggregate` or `group_by` result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateRow {
    values: Map<String, JsonValue>,
}

impl AggregateRow {
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(values) => Self { values },
            _ => Self::default(),
        }
    }

    pub fn count(&self) -> u64 {
        self.values
            .get(COUNT_ALIAS)
            .and_then(JsonValue::as_u64)
            .unwrap_or(0)
    }

    /// `None` when the column was not summed or every input was NULL.
    pub fn sum(&self, column: impl IdenStatic) -> Option<f64> {
        self.values
            .get(&alias("sum", &column))
            .and_then(JsonValue::as_f64)
    }

    pub fn avg(&self, column: impl IdenStatic) -> Option<f64> {
        self.values
            .get(&alias("avg", &column))
            .and_then(JsonValue::as_f64)
    }

    pub fn min(&self, column: impl IdenStatic) -> Option<&JsonValue> {
        self.non_null(&alias("min", &column))
    }

    pub fn max(&self, column: impl IdenStatic) -> Option<&JsonValue> {
        self.non_null(&alias("max", &column))
    }

    /// Value of a group key column.
    pub fn key(&self, column: impl IdenStatic) -> Option<&JsonValue> {
        self.non_null(column.as_str())
    }

    pub fn key_str(&self, column: impl IdenStatic) -> Option<&str> {
        self.key(column).and_then(JsonValue::as_str)
    }

    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.values)
    }

    fn non_null(&self, name: &str) -> Option<&JsonValue> {
        self.values.get(name).filter(|v| !v.is_null())
    }
}
