//! User and role repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::base::Repository;
use super::entities::{role, user, user_role};
use crate::domain::User;
use crate::errors::AppResult;

/// Users and their role memberships within one unit of work
pub struct UserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> UserRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let found = self.get(user::Column::Username.eq(username)).await?;
        self.with_roles(found).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let found = self.get(user::Column::Email.eq(email)).await?;
        self.with_roles(found).await
    }

    /// Insert a user with no roles.
    pub async fn create_user(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> AppResult<User> {
        let model = self
            .create(user::ActiveModel {
                id: Set(Uuid::new_v4()),
                username: Set(username),
                email: Set(email),
                password_hash: Set(password_hash),
                refresh_token: Set(None),
                refresh_token_expiry: Set(None),
                created_at: Set(Utc::now()),
            })
            .await?;

        Ok(model.into_domain(Vec::new()))
    }

    /// Replace the stored refresh token. `None` revokes it.
    ///
    /// The expiry is only touched when `expiry` is given.
    pub async fn set_refresh_token(
        &self,
        user_id: Uuid,
        token: Option<String>,
        expiry: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let mut active = user::ActiveModel {
            id: Set(user_id),
            refresh_token: Set(token),
            ..Default::default()
        };
        if let Some(expiry) = expiry {
            active.refresh_token_expiry = Set(Some(expiry));
        }

        self.update(active).await?;
        Ok(())
    }

    /// Role names held by the user, sorted.
    pub async fn roles_of(&self, model: &user::Model) -> AppResult<Vec<String>> {
        let roles = model
            .find_related(role::Entity)
            .order_by_asc(role::Column::Name)
            .all(self.txn)
            .await?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    pub async fn find_role(&self, name: &str) -> AppResult<Option<role::Model>> {
        role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(self.txn)
            .await
            .map_err(Into::into)
    }

    pub async fn create_role(&self, name: &str) -> AppResult<role::Model> {
        role::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(self.txn)
        .await
        .map_err(Into::into)
    }

    /// Add the membership. Returns `false` when the user already holds the role.
    pub async fn add_to_role(&self, user_id: Uuid, role: &role::Model) -> AppResult<bool> {
        let existing = user_role::Entity::find_by_id((user_id, role.id))
            .one(self.txn)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role.id),
        }
        .insert(self.txn)
        .await?;

        Ok(true)
    }

    async fn with_roles(&self, found: Option<user::Model>) -> AppResult<Option<User>> {
        match found {
            Some(model) => {
                let roles = self.roles_of(&model).await?;
                Ok(Some(model.into_domain(roles)))
            }
            None => Ok(None),
        }
    }
}

impl<'a> Repository<user::Entity, user::ActiveModel> for UserRepository<'a> {
    fn txn(&self) -> &DatabaseTransaction {
        self.txn
    }
}
