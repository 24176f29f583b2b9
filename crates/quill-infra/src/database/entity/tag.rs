//! Tag entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub tag_name: String,
    #[sea_orm(indexed)]
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::post_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Tag {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            tag_name: model.tag_name,
            slug: model.slug,
        }
    }
}

impl From<quill_core::domain::Tag> for ActiveModel {
    fn from(tag: quill_core::domain::Tag) -> Self {
        Self {
            id: Set(tag.id),
            tag_name: Set(tag.tag_name),
            slug: Set(tag.slug),
        }
    }
}
