use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::FromRow;

pub const TABLE_NAME: &str = "public.profiles";

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub lastname: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}
