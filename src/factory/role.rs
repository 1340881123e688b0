use chrono::{DateTime, FixedOffset};
use fake::{Dummy, Fake, Faker};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::model::role::{Role, TABLE_NAME};

pub struct RoleFactory<T: Clone> {
    modifier_one: fn(x: &Role, ext: T) -> Role,
    modifier_many: fn(x: &Role, idx: usize, ext: T) -> Role,
}

impl<T: Clone> Default for RoleFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> RoleFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Role, ext: T) -> Role) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &Role, idx: usize, ext: T) -> Role) {
        self.modifier_many = modifier
    }

    /// The id comes from the database, whatever the modifier sets.
    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<Role> {
        let data = (self.modifier_one)(&RoleDummy::generate(), ext);
        let mut tx = db.begin().await?;
        let role = insert(&mut tx, &data).await?;
        tx.commit().await?;
        Ok(role)
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Role>> {
        let mut result: Vec<Role> = vec![];
        let mut tx = db.begin().await?;
        for idx in 0..num as usize {
            let data = (self.modifier_many)(&RoleDummy::generate(), idx, ext.clone());
            result.push(insert(&mut tx, &data).await?);
        }
        tx.commit().await?;
        Ok(result)
    }
}

async fn insert(tx: &mut Transaction<'_, Postgres>, data: &Role) -> anyhow::Result<Role> {
    let role: Role = sqlx::query_as(
        format!(
            r#"
        INSERT INTO {} (name, description, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.active)
    .bind(data.created_at)
    .bind(data.updated_at)
    .fetch_one(&mut **tx)
    .await?;
    Ok(role)
}

#[derive(Debug, Deserialize, Dummy, Clone)]
struct RoleDummy {
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl RoleDummy {
    fn generate() -> Role {
        let dummy = Faker.fake::<Self>();
        Role {
            id: 0,
            name: dummy.name,
            description: dummy.description,
            active: dummy.active,
            created_at: dummy.created_at,
            updated_at: dummy.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use crate::{factory::role::RoleFactory, model::role::Role};

    #[sqlx::test]
    async fn test_generate_one(pool: PgPool) -> anyhow::Result<()> {
        // When
        let mut factory = RoleFactory::new();
        let role = factory.generate_one(&pool, ()).await?;

        // Expect
        let num_data: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM public.roles"#)
            .fetch_one(&pool)
            .await?;
        assert_eq!(num_data.0, 1);
        assert!(role.id > 0);
        Ok(())
    }

    #[sqlx::test]
    async fn test_generate_one_modified(pool: PgPool) -> anyhow::Result<()> {
        // When
        let mut factory = RoleFactory::<&str>::new();
        factory.modified_one(|data, ext| Role {
            name: ext.to_string(),
            description: None,
            active: false,
            ..data.clone()
        });
        factory.generate_one(&pool, "auditor").await?;

        // Expect
        let res: (String, Option<String>, bool) =
            sqlx::query_as(r#"SELECT name, description, active FROM public.roles"#)
                .fetch_one(&pool)
                .await?;
        assert_eq!(res.0, "auditor");
        assert_eq!(res.1, None);
        assert!(!res.2);
        Ok(())
    }

    #[sqlx::test]
    async fn test_generate_many_modified(pool: PgPool) -> anyhow::Result<()> {
        // When
        let mut factory = RoleFactory::<()>::new();
        factory.modified_many(|data, idx, _| Role {
            name: format!("role-{}", idx),
            active: true,
            ..data.clone()
        });
        let roles = factory.generate_many(&pool, 5, ()).await?;

        // Expect
        assert_eq!(roles.len(), 5);
        let res: Vec<(String, bool)> =
            sqlx::query_as(r#"SELECT name, active FROM public.roles ORDER BY id"#)
                .fetch_all(&pool)
                .await?;
        assert_eq!(res.len(), 5);
        for (idx, item) in res.iter().enumerate() {
            assert_eq!(item.0, format!("role-{}", idx));
            assert!(item.1);
        }
        Ok(())
    }
}
