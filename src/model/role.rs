use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::FromRow;

pub const TABLE_NAME: &str = "public.roles";

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}
