use chrono::{DateTime, FixedOffset, Local};
use sqlx::{Postgres, Transaction};

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::user::{User, TABLE_NAME},
};

/// All users, newest id first, or only the one matching `id`.
pub async fn get_users(
    tx: &mut Transaction<'_, Postgres>,
    id: Option<i32>,
) -> anyhow::Result<Vec<User>> {
    let mut binds: Vec<SqlxBinds> = vec![];
    let mut filters: Vec<String> = vec![];
    if let Some(id) = id {
        binds.push(SqlxBinds::Int(id));
        filters.push(format!("id = ${}", binds.len()));
    }
    let stmt = query_builder(None, TABLE_NAME, &filters, &["id DESC"], None);
    let data = binds_query_as::<User>(&stmt, binds)
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_users_by_role_ids(
    tx: &mut Transaction<'_, Postgres>,
    role_ids: &[i32],
) -> anyhow::Result<Vec<User>> {
    if role_ids.is_empty() {
        return Ok(vec![]);
    }
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &["role_id = ANY($1)".to_string()],
        &["id ASC"],
        None,
    );
    let data = binds_query_as::<User>(&stmt, vec![SqlxBinds::IntArray(role_ids.to_vec())])
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_user_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
) -> anyhow::Result<Option<User>> {
    let stmt = query_builder(None, TABLE_NAME, &["id = $1".to_string()], &[], None);
    let data = binds_query_as::<User>(&stmt, vec![SqlxBinds::Int(id)])
        .fetch_optional(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_user_by_email(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
) -> anyhow::Result<Option<User>> {
    let stmt = query_builder(None, TABLE_NAME, &["email = $1".to_string()], &[], Some(1));
    let data = binds_query_as::<User>(&stmt, vec![SqlxBinds::String(email.to_string())])
        .fetch_optional(&mut **tx)
        .await?;
    Ok(data)
}

/// `password` must already be hashed.
pub async fn create_user(
    tx: &mut Transaction<'_, Postgres>,
    email: String,
    password: String,
    active: bool,
    role_id: i32,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<User> {
    let now = now.unwrap_or(Local::now().fixed_offset());
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
    .bind(email)
    .bind(password)
    .bind(active)
    .bind(role_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(user)
}

/// Merge new values into `user`. A `None` password keeps the current hash.
pub async fn update_user(
    tx: &mut Transaction<'_, Postgres>,
    user: &mut User,
    email: String,
    password: Option<String>,
    active: bool,
    role_id: i32,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<()> {
    user.email = email;
    if let Some(password) = password {
        user.password = password;
    }
    user.active = active;
    user.role_id = role_id;
    user.updated_at = now.unwrap_or(Local::now().fixed_offset());
    sqlx::query(
        format!(
            r#"UPDATE {}
            SET email = $1, password = $2, active = $3, role_id = $4, updated_at = $5
            WHERE id = $6"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&user.email)
    .bind(&user.password)
    .bind(user.active)
    .bind(user.role_id)
    .bind(user.updated_at)
    .bind(user.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Flip `active`. Users are never removed.
pub async fn toggle_user_active(
    tx: &mut Transaction<'_, Postgres>,
    user: &mut User,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<()> {
    user.active = !user.active;
    user.updated_at = now.unwrap_or(Local::now().fixed_offset());
    sqlx::query(
        format!(
            r#"UPDATE {} SET active = $1, updated_at = $2
            WHERE id = $3"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user.active)
    .bind(user.updated_at)
    .bind(user.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
