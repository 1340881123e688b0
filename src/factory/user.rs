use chrono::{DateTime, FixedOffset};
use fake::{faker::internet::en::SafeEmail, Dummy, Fake, Faker};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::model::user::{User, TABLE_NAME};

/// Users always belong to a role, so the role id is passed on every call.
pub struct UserFactory<T: Clone> {
    modifier_one: fn(x: &User, ext: T) -> User,
    modifier_many: fn(x: &User, idx: usize, ext: T) -> User,
}

impl<T: Clone> Default for UserFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UserFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &User, ext: T) -> User) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &User, idx: usize, ext: T) -> User) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(&mut self, db: &PgPool, role_id: i32, ext: T) -> anyhow::Result<User> {
        let data = (self.modifier_one)(&UserDummy::generate(role_id), ext);
        let mut tx = db.begin().await?;
        let user = insert(&mut tx, &data).await?;
        tx.commit().await?;
        Ok(user)
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        role_id: i32,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<User>> {
        let mut result: Vec<User> = vec![];
        let mut tx = db.begin().await?;
        for idx in 0..num as usize {
            let mut data = UserDummy::generate(role_id);
            // fake emails may repeat
            data.email = format!("{}.{}", idx, data.email);
            let data = (self.modifier_many)(&data, idx, ext.clone());
            result.push(insert(&mut tx, &data).await?);
        }
        tx.commit().await?;
        Ok(result)
    }
}

async fn insert(tx: &mut Transaction<'_, Postgres>, data: &User) -> anyhow::Result<User> {
    let user: User = sqlx::query_as(
        format!(
            r#"
        INSERT INTO {} (email, password, active, role_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&data.email)
    .bind(&data.password)
    .bind(data.active)
    .bind(data.role_id)
    .bind(data.created_at)
    .bind(data.updated_at)
    .fetch_one(&mut **tx)
    .await?;
    Ok(user)
}

#[derive(Debug, Deserialize, Dummy, Clone)]
struct UserDummy {
    #[dummy(faker = "SafeEmail()")]
    pub email: String,
    pub password: String,
    pub active: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl UserDummy {
    fn generate(role_id: i32) -> User {
        let dummy = Faker.fake::<Self>();
        User {
            id: 0,
            email: dummy.email,
            password: dummy.password,
            active: dummy.active,
            role_id,
            created_at: dummy.created_at,
            updated_at: dummy.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use crate::{
        factory::{role::RoleFactory, user::UserFactory},
        model::user::User,
    };

    #[sqlx::test]
    async fn test_generate_one_modified(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let role = RoleFactory::<()>::new().generate_one(&pool, ()).await?;

        // When
        let mut factory = UserFactory::<bool>::new();
        factory.modified_one(|data, ext| User {
            email: "jane@mail.com".to_string(),
            active: ext,
            ..data.clone()
        });
        let user = factory.generate_one(&pool, role.id, false).await?;

        // Expect
        let res: (i32, String, bool, i32) =
            sqlx::query_as(r#"SELECT id, email, active, role_id FROM public.users"#)
                .fetch_one(&pool)
                .await?;
        assert_eq!(res.0, user.id);
        assert_eq!(res.1, "jane@mail.com");
        assert!(!res.2);
        assert_eq!(res.3, role.id);
        Ok(())
    }

    #[sqlx::test]
    async fn test_generate_many(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let role = RoleFactory::<()>::new().generate_one(&pool, ()).await?;

        // When
        let mut factory = UserFactory::new();
        factory.generate_many(&pool, role.id, 10, ()).await?;

        // Expect
        let num_data: (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM public.users WHERE role_id = $1"#)
                .bind(role.id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(num_data.0, 10);
        Ok(())
    }
}
