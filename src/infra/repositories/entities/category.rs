//! Category database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::CategoryDto;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CategoryDto {
    fn from(model: Model) -> Self {
        CategoryDto {
            id: model.id,
            name: model.name,
            image_url: model.image_url,
        }
    }
}
