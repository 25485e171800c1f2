use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::Serialize;

/// Account role, stored as a lowercase string.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    serde::Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "teacher")]
    Teacher,
}

/// Represents an account in the `users` table. Students and teachers each
/// hold a profile row referencing their user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique campus identifier (cms-id).
    pub username: String,
    /// Securely hashed password string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::student::Entity")]
    Student,
    #[sea_orm(has_one = "super::teacher::Entity")]
    Teacher,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a user with an argon2-hashed password.
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
        role: Role,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))?
            .to_string();

        let now = Utc::now();
        let am = ActiveModel {
            username: Set(username.to_owned()),
            password_hash: Set(hash),
            role: Set(role),
            first_name: Set(first_name.to_owned()),
            last_name: Set(last_name.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        am.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }

    /// Verifies a plaintext password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_hashes_password_and_verifies() {
        let db = setup_test_db().await;
        let u = Model::create(&db, "053-16-0029", "123456", Role::Admin, "Admin", "User")
            .await
            .unwrap();
        assert_ne!(u.password_hash, "123456");
        assert!(u.verify_password("123456"));
        assert!(!u.verify_password("654321"));
    }

    #[tokio::test]
    async fn username_is_unique_and_findable() {
        let db = setup_test_db().await;
        let created = Model::create(&db, "stu-001", "pw", Role::Student, "A", "B")
            .await
            .unwrap();
        let dup = Model::create(&db, "stu-001", "pw", Role::Student, "C", "D").await;
        assert!(dup.is_err());

        let found = Model::find_by_username(&db, "stu-001").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(Model::find_by_username(&db, "stu-002").await.unwrap().is_none());
    }
}
