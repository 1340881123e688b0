use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    Postgres,
};

/// Values bound to the `$n` placeholders of a built statement.
#[derive(Clone, Debug)]
pub enum SqlxBinds {
    String(String),
    Int(i32),
    IntArray(Vec<i32>),
}

pub fn binds_query_as<'a, T: for<'r> sqlx::FromRow<'r, PgRow>>(
    stmt: &'a str,
    binds: Vec<SqlxBinds>,
) -> QueryAs<'a, Postgres, T, PgArguments> {
    let mut q: QueryAs<'_, Postgres, T, PgArguments> = sqlx::query_as(stmt);
    for bind in binds {
        q = match bind {
            SqlxBinds::String(val) => q.bind(val),
            SqlxBinds::Int(val) => q.bind(val),
            SqlxBinds::IntArray(val) => q.bind(val),
        };
    }
    q
}

/// Build a `SELECT` statement. Filters are joined with `AND`, placeholders
/// inside them must match the order of the binds passed to the query.
pub fn query_builder(
    select: Option<&str>,
    table_name: &str,
    wheres: &[String],
    order_by: &[&str],
    limit: Option<u32>,
) -> String {
    let mut stmt = format!("SELECT {} FROM {}", select.unwrap_or("*"), table_name);
    if !wheres.is_empty() {
        stmt.push_str(" WHERE ");
        stmt.push_str(&wheres.join(" AND "));
    }
    if !order_by.is_empty() {
        stmt.push_str(" ORDER BY ");
        stmt.push_str(&order_by.join(", "));
    }
    if let Some(limit) = limit {
        stmt.push_str(&format!(" LIMIT {}", limit));
    }
    stmt
}
