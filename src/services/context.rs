use sea_orm::DatabaseConnection;

use crate::{
    auth::providers::AuthProvider,
    db::dao::{DaoContext, RefreshTokenDao},
    services::{auth_service::AuthService, user_service::UserService},
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn auth<'a>(&self, provider: &'a dyn AuthProvider) -> AuthService<'a> {
        AuthService::new(provider)
    }

    pub fn refresh_token_dao(&self) -> RefreshTokenDao {
        self.daos.refresh_token()
    }
}
