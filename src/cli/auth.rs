use anyhow::{anyhow, bail};
use sqlx::PgPool;
use tracing::info;

use crate::{
    core::security::hash_password,
    model::user::User,
    repository,
    validator::user::{ProfilePayload, PASSWORD_MIN_LENGTH},
};

/// Create an active user with its profile, attached to an existing role.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    role_id: i32,
    profile: ProfilePayload,
) -> anyhow::Result<User> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        bail!(
            "password must have at least {} characters",
            PASSWORD_MIN_LENGTH
        );
    }
    let mut tx = pool.begin().await?;
    if repository::role::get_role_by_id(&mut tx, role_id)
        .await?
        .is_none()
    {
        bail!("role {} does not exist", role_id);
    }
    if repository::user::get_user_by_email(&mut tx, email)
        .await?
        .is_some()
    {
        bail!("email {} is already registered", email);
    }

    let hashed_password = hash_password(password).map_err(|err| anyhow!(err.to_string()))?;
    let user = repository::user::create_user(
        &mut tx,
        email.to_string(),
        hashed_password,
        true,
        role_id,
        None,
    )
    .await?;
    repository::profile::create_profile(&mut tx, user.id, profile, None).await?;
    tx.commit().await?;
    info!("created user {} ({})", user.email, user.id);
    Ok(user)
}
