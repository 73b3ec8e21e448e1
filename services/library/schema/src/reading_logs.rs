use sea_orm::entity::prelude::*;

/// First and latest time a user opened an ebook. One row per (user, ebook).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reading_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub ebook_id: Uuid,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub last_read_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::ebooks::Entity",
        from = "Column::EbookId",
        to = "super::ebooks::Column::Id"
    )]
    Ebook,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ebooks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ebook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
