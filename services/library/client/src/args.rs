use sea_orm::{
    Condition, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{IntoCondition, LockType},
};

use lectern_core::sea_ext::OrderByRandom;
use lectern_domain::pagination::PageRequest;

/// Arguments of the `find_*` family: filter, ordering and window.
///
/// An empty `FindArgs` matches every row in storage order.
pub struct FindArgs<E: EntityTrait> {
    pub filter: Condition,
    pub order_by: Vec<(E::Column, Order)>,
    pub random: bool,
    pub skip: Option<u64>,
    pub take: Option<u64>,
    /// Row lock taken by the select; only meaningful inside a transaction.
    pub lock: Option<LockType>,
}

impl<E: EntityTrait> Default for FindArgs<E> {
    fn default() -> Self {
        Self {
            filter: Condition::all(),
            order_by: Vec::new(),
            random: false,
            skip: None,
            take: None,
            lock: None,
        }
    }
}

impl<E: EntityTrait> Clone for FindArgs<E> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            order_by: self.order_by.clone(),
            random: self.random,
            skip: self.skip,
            take: self.take,
            lock: self.lock.clone(),
        }
    }
}

impl<E: EntityTrait> std::fmt::Debug for FindArgs<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindArgs")
            .field("filter", &self.filter)
            .field("order_by", &self.order_by)
            .field("random", &self.random)
            .field("skip", &self.skip)
            .field("take", &self.take)
            .field("lock", &self.lock)
            .finish()
    }
}

impl<E: EntityTrait> FindArgs<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// AND `condition` into the filter.
    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.filter = self.filter.add(condition.into_condition());
        self
    }

    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.order_by.push((column, order));
        self
    }

    /// Order randomly after any explicit column ordering.
    pub fn order_randomly(mut self) -> Self {
        self.random = true;
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

    /// `SELECT ... FOR UPDATE`: matched rows stay locked until the enclosing
    /// transaction ends.
    pub fn lock_for_update(mut self) -> Self {
        self.lock = Some(LockType::Update);
        self
    }

    pub fn page(self, page: PageRequest) -> Self {
        self.skip(page.offset()).take(page.limit())
    }

    pub fn into_select(self) -> Select<E> {
        let mut select = E::find().filter(self.filter);
        for (column, order) in self.order_by {
            select = select.order_by(column, order);
        }
        if self.random {
            select = select.order_by_random();
        }
        if let Some(skip) = self.skip {
            select = select.offset(skip);
        }
        if let Some(take) = self.take {
            select = select.limit(take);
        }
        if let Some(lock) = self.lock {
            select = select.lock(lock);
        }
        select
    }
}
