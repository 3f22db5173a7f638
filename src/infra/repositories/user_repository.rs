//! User repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserRole};

/// Fields of a user about to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: UserRole,
}

/// User queries over any connection or transaction.
pub struct UserRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert a new user
    pub async fn create(&self, new_user: NewUser) -> Result<User, DbErr> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            email: Set(new_user.email),
            role: Set(new_user.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(User::from(model))
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbErr> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn)
            .await?;

        Ok(result.map(User::from))
    }

    /// Replace a user's password hash
    pub async fn update_password(&self, id: i32, password_hash: String) -> Result<(), DbErr> {
        let user = UserEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {}", id)))?;

        let mut active: ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());
        active.update(self.conn).await?;

        Ok(())
    }

    /// List all users ordered by id
    pub async fn list(&self) -> Result<Vec<User>, DbErr> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        UserEntity::find().count(self.conn).await
    }
}
