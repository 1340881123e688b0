use chrono::{DateTime, FixedOffset};
use fake::{
    faker::{
        address::en::StreetName,
        name::en::{FirstName, LastName},
        phone_number::en::PhoneNumber,
    },
    Dummy, Fake, Faker,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::model::profile::{Profile, TABLE_NAME};

pub struct ProfileFactory<T: Clone> {
    modifier_one: fn(x: &Profile, ext: T) -> Profile,
}

impl<T: Clone> Default for ProfileFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ProfileFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Profile, ext: T) -> Profile) {
        self.modifier_one = modifier
    }

    pub async fn generate_one(
        &mut self,
        db: &PgPool,
        user_id: i32,
        ext: T,
    ) -> anyhow::Result<Profile> {
        let data = (self.modifier_one)(&ProfileDummy::generate(user_id), ext);
        let profile: Profile = sqlx::query_as(
            format!(
                r#"
            INSERT INTO {} (user_id, name, lastname, phone, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *"#,
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&data.lastname)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(data.created_at)
        .bind(data.updated_at)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }
}

#[derive(Debug, Deserialize, Dummy, Clone)]
struct ProfileDummy {
    #[dummy(faker = "FirstName()")]
    pub name: String,
    #[dummy(faker = "LastName()")]
    pub lastname: String,
    #[dummy(faker = "PhoneNumber()")]
    pub phone: String,
    #[dummy(faker = "StreetName()")]
    pub address: String,
    pub created_at: DateTime<FixedOffset>,
}

impl ProfileDummy {
    fn generate(user_id: i32) -> Profile {
        let dummy = Faker.fake::<Self>();
        Profile {
            id: 0,
            user_id,
            name: dummy.name,
            lastname: dummy.lastname,
            phone: dummy.phone,
            address: dummy.address,
            created_at: dummy.created_at,
            updated_at: dummy.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use crate::factory::{profile::ProfileFactory, role::RoleFactory, user::UserFactory};

    #[sqlx::test]
    async fn test_generate_one(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let role = RoleFactory::<()>::new().generate_one(&pool, ()).await?;
        let user = UserFactory::<()>::new()
            .generate_one(&pool, role.id, ())
            .await?;

        // When
        let profile = ProfileFactory::<()>::new()
            .generate_one(&pool, user.id, ())
            .await?;

        // Expect
        let res: (i32, String) =
            sqlx::query_as(r#"SELECT user_id, name FROM public.profiles WHERE id = $1"#)
                .bind(profile.id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(res.0, user.id);
        assert_eq!(res.1, profile.name);
        Ok(())
    }
}
