use sea_orm::entity::prelude::*;

/// Ebook in the catalog.
///
/// `category` keeps the category name denormalized for listing; `category_id`
/// is the optional link to `categories`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ebooks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub pdf_url: Option<String>,
    pub public_id: Option<String>,
    pub category: String,
    pub category_id: Option<Uuid>,
    pub is_premium: bool,
    pub is_active: bool,
    pub priority: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::reading_logs::Entity")]
    ReadingLogs,
    #[sea_orm(has_many = "super::reading_progress::Entity")]
    ReadingProgress,
    #[sea_orm(has_many = "super::readlists::Entity")]
    Readlists,
    #[sea_orm(has_many = "super::annotations::Entity")]
    Annotations,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
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
