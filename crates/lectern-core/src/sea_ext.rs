use sea_orm::{
    EntityTrait, Order, QueryOrder, Select,
    sea_query::{Func, SimpleExpr},
};

pub trait OrderByRandom {
    fn order_by_random(self) -> Self;
}

impl<E> OrderByRandom for Select<E>
where
    E: EntityTrait,
{
    fn order_by_random(mut self) -> Self {
        QueryOrder::query(&mut self)
            .order_by_expr(SimpleExpr::FunctionCall(Func::random()), Order::Desc);
        self
    }
}

/// Case-insensitive substring pattern for `ILIKE`, with `%`, `_` and `\` escaped.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
