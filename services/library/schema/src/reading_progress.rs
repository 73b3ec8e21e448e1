use sea_orm::entity::prelude::*;

/// Last reading position of a user in an ebook. One row per (user, ebook).
///
/// `progress` is a percentage in `0.0..=100.0`; `current_location` is an
/// opaque reader position (e.g. an EPUB CFI).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reading_progress")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub ebook_id: Uuid,
    pub current_location: Option<String>,
    pub progress: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
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
