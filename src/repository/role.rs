use chrono::{DateTime, FixedOffset, Local};
use sqlx::{Postgres, Transaction};

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::role::{Role, TABLE_NAME},
};

/// All roles ordered by id, or only the one matching `id`.
pub async fn get_roles(
    tx: &mut Transaction<'_, Postgres>,
    id: Option<i32>,
) -> anyhow::Result<Vec<Role>> {
    let mut binds: Vec<SqlxBinds> = vec![];
    let mut filters: Vec<String> = vec![];
    if let Some(id) = id {
        binds.push(SqlxBinds::Int(id));
        filters.push(format!("id = ${}", binds.len()));
    }
    let stmt = query_builder(None, TABLE_NAME, &filters, &["id ASC"], None);
    let data = binds_query_as::<Role>(&stmt, binds)
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_roles_by_ids(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[i32],
) -> anyhow::Result<Vec<Role>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let stmt = query_builder(None, TABLE_NAME, &["id = ANY($1)".to_string()], &[], None);
    let data = binds_query_as::<Role>(&stmt, vec![SqlxBinds::IntArray(ids.to_vec())])
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_role_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
) -> anyhow::Result<Option<Role>> {
    let stmt = query_builder(None, TABLE_NAME, &["id = $1".to_string()], &[], None);
    let data = binds_query_as::<Role>(&stmt, vec![SqlxBinds::Int(id)])
        .fetch_optional(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn create_role(
    tx: &mut Transaction<'_, Postgres>,
    name: String,
    description: Option<String>,
    active: bool,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<Role> {
    let now = now.unwrap_or(Local::now().fixed_offset());
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
    .bind(name)
    .bind(description)
    .bind(active)
    .bind(now)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(role)
}

pub async fn update_role(
    tx: &mut Transaction<'_, Postgres>,
    role: &mut Role,
    name: String,
    description: Option<String>,
    active: bool,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<()> {
    role.name = name;
    role.description = description;
    role.active = active;
    role.updated_at = now.unwrap_or(Local::now().fixed_offset());
    sqlx::query(
        format!(
            r#"
        UPDATE {}
        SET name = $1, description = $2, active = $3, updated_at = $4
        WHERE id = $5"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&role.name)
    .bind(&role.description)
    .bind(role.active)
    .bind(role.updated_at)
    .bind(role.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Flip `active`. Roles are never removed.
pub async fn toggle_role_active(
    tx: &mut Transaction<'_, Postgres>,
    role: &mut Role,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<()> {
    role.active = !role.active;
    role.updated_at = now.unwrap_or(Local::now().fixed_offset());
    sqlx::query(
        format!(
            r#"UPDATE {}
    SET active = $1, updated_at = $2
    WHERE id = $3"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(role.active)
    .bind(role.updated_at)
    .bind(role.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
