use std::sync::Arc;

use redis::ConnectionLike;
use sqlx::PgPool;

use super::{
    security::{generate_token_from_user, hash_password},
    session::add_session,
};
use crate::{
    model::{profile::Profile, role::Role, user::User},
    repository::{profile::create_profile, role::create_role, user::create_user},
    settings::{get_config, Config},
    validator::user::ProfilePayload,
    AppState,
};

/// Config for route tests: routes served under `/api`.
pub fn test_config() -> Config {
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    config
}

pub fn test_app_state(pool: PgPool, config: &Config) -> anyhow::Result<Arc<AppState>> {
    let client = redis::Client::open(config.redis_url.clone())?;
    let redis_pool = r2d2::Pool::builder().build(client)?;
    Ok(Arc::new(AppState::new(pool, redis_pool, config.clone())?))
}

pub struct TestUser {
    pub role: Role,
    pub user: User,
    pub profile: Profile,
    pub token: String,
}

/// Active user with its own role and profile, plus a live session.
pub async fn generate_test_user<C: ConnectionLike>(
    db: &PgPool,
    redis_conn: &mut C,
    config: &Config,
    email: &str,
    password: &str,
) -> anyhow::Result<TestUser> {
    let mut tx = db.begin().await?;
    let role = create_role(&mut tx, "tester".to_string(), None, true, None).await?;
    let hashed_password =
        hash_password(password).map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let user = create_user(
        &mut tx,
        email.to_string(),
        hashed_password,
        true,
        role.id,
        None,
    )
    .await?;
    let profile = create_profile(
        &mut tx,
        user.id,
        ProfilePayload {
            name: "Test".to_string(),
            lastname: "User".to_string(),
            phone: "555-0100".to_string(),
            address: "Main St 1".to_string(),
        },
        None,
    )
    .await?;
    tx.commit().await?;

    let token = generate_token_from_user(&user, config)?;
    add_session(redis_conn, &user, config, &token)?;
    Ok(TestUser {
        role,
        user,
        profile,
        token,
    })
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::core::{security::get_user_from_token, session::get_session};

    #[sqlx::test]
    async fn test_generate_test_user(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let config = get_config();
        let client = redis::Client::open(config.redis_url.clone())?;
        let mut redis_conn = client.get_connection()?;

        // When
        let res = generate_test_user(
            &pool,
            &mut redis_conn,
            &config,
            "tester@mail.com",
            "testpassword",
        )
        .await?;

        // Expect
        let user: Option<(i32, String)> =
            sqlx::query_as("SELECT id, email FROM public.users WHERE id = $1")
                .bind(res.user.id)
                .fetch_optional(&pool)
                .await?;
        assert!(user.is_some());
        let profile: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM public.profiles WHERE user_id = $1")
                .bind(res.user.id)
                .fetch_optional(&pool)
                .await?;
        assert_eq!(profile.map(|x| x.0), Some(res.profile.id));

        let mut tx = pool.begin().await?;
        let user_token =
            get_user_from_token(&mut tx, &mut redis_conn, &config, Some(res.token.clone()))
                .await?;
        assert_eq!(user_token.map(|x| x.email), Some("tester@mail.com".to_string()));

        let session = get_session(&mut redis_conn, &res.token)?;
        assert_eq!(session.map(|x| x.user_id), Some(res.user.id));
        Ok(())
    }
}
