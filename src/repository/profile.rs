use chrono::{DateTime, FixedOffset, Local};
use sqlx::{Postgres, Transaction};

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::profile::{Profile, TABLE_NAME},
    validator::user::ProfilePayload,
};

pub async fn get_profiles_by_user_ids(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[i32],
) -> anyhow::Result<Vec<Profile>> {
    if user_ids.is_empty() {
        return Ok(vec![]);
    }
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &["user_id = ANY($1)".to_string()],
        &[],
        None,
    );
    let data = binds_query_as::<Profile>(&stmt, vec![SqlxBinds::IntArray(user_ids.to_vec())])
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_profile_by_user_id(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
) -> anyhow::Result<Option<Profile>> {
    let stmt = query_builder(None, TABLE_NAME, &["user_id = $1".to_string()], &[], None);
    let data = binds_query_as::<Profile>(&stmt, vec![SqlxBinds::Int(user_id)])
        .fetch_optional(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn create_profile(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    payload: ProfilePayload,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<Profile> {
    let now = now.unwrap_or(Local::now().fixed_offset());
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
    .bind(user_id)
    .bind(payload.name)
    .bind(payload.lastname)
    .bind(payload.phone)
    .bind(payload.address)
    .bind(now)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(profile)
}

pub async fn update_profile(
    tx: &mut Transaction<'_, Postgres>,
    profile: &mut Profile,
    payload: ProfilePayload,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<()> {
    profile.name = payload.name;
    profile.lastname = payload.lastname;
    profile.phone = payload.phone;
    profile.address = payload.address;
    profile.updated_at = now.unwrap_or(Local::now().fixed_offset());
    sqlx::query(
        format!(
            r#"UPDATE {}
            SET name = $1, lastname = $2, phone = $3, address = $4, updated_at = $5
            WHERE id = $6"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&profile.name)
    .bind(&profile.lastname)
    .bind(&profile.phone)
    .bind(&profile.address)
    .bind(profile.updated_at)
    .bind(profile.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
