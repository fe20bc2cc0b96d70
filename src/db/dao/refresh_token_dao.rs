use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RefreshTokenDao {
    pub async fn save(
        &self,
        user_id: &Uuid,
        token: &str,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<refresh_token::Model> {
        let model = refresh_token::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(*user_id),
            expires_at: Set(expires_at),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Exact match, expired rows included so callers can retire them.
    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<refresh_token::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(refresh_token::Column::Token.eq(token)))
            .await
    }

    /// Conditional delete; the returned row count is the only proof that this
    /// caller, and not a concurrent one, consumed the token.
    pub async fn delete_by_token(&self, token: &str) -> DaoResult<u64> {
        let result = RefreshToken::delete_many()
            .filter(refresh_token::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn delete_all_for_user(&self, user_id: &Uuid) -> DaoResult<u64> {
        let result = RefreshToken::delete_many()
            .filter(refresh_token::Column::UserId.eq(*user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
