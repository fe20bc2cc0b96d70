use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{UserStatus, prelude::User, user};

/// Fields supplied at registration; id and timestamps are stamped by
/// [`DaoBase::create`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub status: UserStatus,
}

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_one(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn create_user(&self, new_user: NewUser) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            phone_number: Set(new_user.phone_number),
            status: Set(new_user.status),
            email_verified: Set(false),
            verify_email_code: Set(None),
            last_login_at: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn set_last_login(
        &self,
        id: &Uuid,
        at: &DateTime<FixedOffset>,
    ) -> DaoResult<user::Model> {
        let at = *at;
        self.update(*id, move |active| {
            active.last_login_at = Set(Some(at));
        })
        .await
    }

    pub async fn set_verify_email_code(&self, id: &Uuid, code: &str) -> DaoResult<user::Model> {
        let code = code.to_string();
        self.update(*id, move |active| {
            active.verify_email_code = Set(Some(code));
        })
        .await
    }

    pub async fn set_password_hash(&self, id: &Uuid, password_hash: &str) -> DaoResult<user::Model> {
        let password_hash = password_hash.to_string();
        self.update(*id, move |active| {
            active.password_hash = Set(password_hash);
        })
        .await
    }

    pub async fn mark_email_verified(&self, id: &Uuid) -> DaoResult<user::Model> {
        self.update(*id, |active| {
            active.email_verified = Set(true);
            active.verify_email_code = Set(None);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use crate::db::entities::{UserStatus, user};

    use super::{NewUser, UserDao};
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid, email: &str) -> user::Model {
        let now = ts();
        user::Model {
            id,
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            phone_number: None,
            status: UserStatus::Active,
            email_verified: false,
            verify_email_code: None,
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn find_by_email_returns_first_match() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "alice@example.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("alice@example.com")
            .await
            .expect("query should succeed");
        assert_eq!(result.map(|u| u.id), Some(id));
    }

    #[tokio::test]
    async fn find_by_email_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("missing@example.com")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn create_user_returns_inserted_row() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "alice@example.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let created = dao
            .create_user(NewUser {
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                phone_number: None,
                status: UserStatus::Active,
            })
            .await
            .expect("insert should succeed");

        assert_eq!(created.id, id);
        assert_eq!(created.status, UserStatus::Active);
        assert!(!created.email_verified);
    }

    #[tokio::test]
    async fn set_last_login_propagates_not_found() {
        let missing_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .set_last_login(&missing_id, &ts())
            .await
            .expect_err("update should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { id, .. } if id == missing_id
        ));
    }

    #[tokio::test]
    async fn mark_email_verified_returns_updated_row() {
        let id = Uuid::new_v4();
        let mut pending = user_model(id, "alice@example.com");
        pending.verify_email_code = Some("a1B2c3".to_string());
        let mut verified = pending.clone();
        verified.email_verified = true;
        verified.verify_email_code = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .append_query_results([[verified]])
            .into_connection();
        let dao = UserDao::new(&db);

        let updated = dao
            .mark_email_verified(&id)
            .await
            .expect("update should succeed");

        assert!(updated.email_verified);
        assert!(updated.verify_email_code.is_none());
    }

    #[tokio::test]
    async fn set_password_hash_replaces_stored_hash() {
        let id = Uuid::new_v4();
        let mut changed = user_model(id, "alice@example.com");
        changed.password_hash = "new-hash".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "alice@example.com")]])
            .append_query_results([[changed]])
            .into_connection();
        let dao = UserDao::new(&db);

        let updated = dao
            .set_password_hash(&id, "new-hash")
            .await
            .expect("update should succeed");

        assert_eq!(updated.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn database_errors_are_not_reported_as_unique_violations() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .find_by_email("alice@example.com")
            .await
            .expect_err("query should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
        assert!(!err.is_unique_violation());
    }
}
