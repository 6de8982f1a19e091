//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{ProductDto, ProductUpdateResponse};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub image_url: String,
    pub stock: f32,
    pub register_date: DateTimeUtc,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductDto {
    fn from(model: Model) -> Self {
        ProductDto {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            category_id: model.category_id,
        }
    }
}

impl From<Model> for ProductUpdateResponse {
    fn from(model: Model) -> Self {
        ProductUpdateResponse {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            stock: model.stock,
            register_date: model.register_date,
            category_id: model.category_id,
        }
    }
}
