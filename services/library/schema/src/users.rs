use sea_orm::entity::prelude::*;

/// Reader account, keyed externally by its Firebase uid.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub firebase_uid: String,
    #[sea_orm(unique)]
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::subscriptions::Entity")]
    Subscription,
    #[sea_orm(has_many = "super::reading_logs::Entity")]
    ReadingLogs,
    #[sea_orm(has_many = "super::reading_progress::Entity")]
    ReadingProgress,
    #[sea_orm(has_many = "super::readlists::Entity")]
    Readlists,
    #[sea_orm(has_many = "super::annotations::Entity")]
    Annotations,
}

impl Related<super::subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl Related<super::reading_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReadingLogs.def()
    }
}

impl Related<super::reading_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReadingProgress.def()
    }
}

impl Related<super::readlists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Readlists.def()
    }
}

impl Related<super::annotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Annotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
