use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, DaoLayerError, DaoResult, UserDao, user_dao::NewUser},
    db::entities::user,
};

/// User store facade. Absence is `Ok(None)` on reads; writes that target a
/// missing row surface `DaoLayerError::NotFound`.
#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> DaoResult<Option<user::Model>> {
        match self.user_dao.find_by_id(*id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        self.user_dao.find_by_email(email).await
    }

    pub async fn create_user(&self, new_user: NewUser) -> DaoResult<user::Model> {
        self.user_dao.create_user(new_user).await
    }

    pub async fn set_last_login(
        &self,
        user_id: &Uuid,
        last_login: &DateTime<FixedOffset>,
    ) -> DaoResult<()> {
        self.user_dao.set_last_login(user_id, last_login).await?;
        Ok(())
    }

    pub async fn set_verify_email_code(&self, user_id: &Uuid, code: &str) -> DaoResult<()> {
        self.user_dao.set_verify_email_code(user_id, code).await?;
        Ok(())
    }

    pub async fn set_password_hash(&self, user_id: &Uuid, password_hash: &str) -> DaoResult<()> {
        self.user_dao.set_password_hash(user_id, password_hash).await?;
        Ok(())
    }

    pub async fn mark_email_verified(&self, user_id: &Uuid) -> DaoResult<()> {
        self.user_dao.mark_email_verified(user_id).await?;
        Ok(())
    }
}
