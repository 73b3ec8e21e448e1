use sea_orm::entity::prelude::*;

/// Catalog category; `slug` is the public key used in URLs.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ebooks::Entity")]
    Ebooks,
}

impl Related<super::ebooks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ebooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
