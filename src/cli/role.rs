use sqlx::PgPool;
use tracing::info;

use crate::{model::role::Role, repository};

pub async fn create_role(
    pool: &PgPool,
    name: &str,
    description: Option<String>,
) -> anyhow::Result<Role> {
    let mut tx = pool.begin().await?;
    let role =
        repository::role::create_role(&mut tx, name.to_string(), description, true, None).await?;
    tx.commit().await?;
    info!("created role {} ({})", role.name, role.id);
    Ok(role)
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use crate::cli::role::create_role;

    #[sqlx::test]
    async fn test_create_role(pool: PgPool) -> anyhow::Result<()> {
        // When
        let role = create_role(&pool, "admin", None).await?;

        // Expect
        let db_res: Option<(String, bool)> =
            sqlx::query_as("SELECT name, active FROM public.roles WHERE id = $1")
                .bind(role.id)
                .fetch_optional(&pool)
                .await?;
        assert_eq!(db_res, Some(("admin".to_string(), true)));
        Ok(())
    }
}
