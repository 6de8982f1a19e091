//! Migration: Seed a sample category and product.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm_migration::prelude::*;

use crate::infra::repositories::entities::{category, product};

const SEED_CATEGORY: &str = "Bebidas";
const SEED_PRODUCT: &str = "Coca Cola Diet";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        let category = category::ActiveModel {
            name: Set(SEED_CATEGORY.to_string()),
            image_url: Set("bebidas.jpg".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        product::ActiveModel {
            name: Set(SEED_PRODUCT.to_string()),
            description: Set("Refrigerante de cola 350ml".to_string()),
            price: Set(Decimal::new(545, 2)),
            image_url: Set("cocacola.jpg".to_string()),
            stock: Set(50.0),
            register_date: Set(Utc::now()),
            category_id: Set(category.id),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        product::Entity::delete_many()
            .filter(product::Column::Name.eq(SEED_PRODUCT))
            .exec(db)
            .await?;

        category::Entity::delete_many()
            .filter(category::Column::Name.eq(SEED_CATEGORY))
            .exec(db)
            .await?;

        Ok(())
    }
}
