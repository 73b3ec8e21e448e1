use sea_orm::entity::prelude::*;

/// Payment attempt for a subscription, updated by gateway notifications.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subscription_id: Uuid,
    #[sea_orm(unique)]
    pub order_id: String,
    pub transaction_status: String,
    pub gross_amount: i64,
    pub payment_type: Option<String>,
    pub transaction_time: Option<chrono::DateTime<chrono::Utc>>,
    pub settlement_time: Option<chrono::DateTime<chrono::Utc>>,
    pub webhook_payload: Option<Json>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subscriptions::Entity",
        from = "Column::SubscriptionId",
        to = "super::subscriptions::Column::Id"
    )]
    Subscription,
}

impl Related<super::subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
