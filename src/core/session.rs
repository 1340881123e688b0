use redis::ConnectionLike;
use serde::{Deserialize, Serialize};

use crate::{model::user::User, settings::Config};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionData {
    pub user_id: i32,
    pub email: String,
}

/// Store the session under the token, expiring together with the JWT.
pub fn add_session<C: ConnectionLike>(
    redis_conn: &mut C,
    user: &User,
    config: &Config,
    token: &str,
) -> anyhow::Result<()> {
    let session_data = SessionData {
        user_id: user.id,
        email: user.email.clone(),
    };
    let session_json = serde_json::to_string(&session_data)?;
    let ttl = config.jwt_exp as u64 * 60;
    redis::Cmd::set_ex(token, session_json, ttl).exec(redis_conn)?;
    Ok(())
}

pub fn get_session<C: ConnectionLike>(
    redis_conn: &mut C,
    token: &str,
) -> anyhow::Result<Option<SessionData>> {
    let res: Option<String> = redis::cmd("get").arg(token).query(redis_conn)?;
    match res {
        Some(val) => Ok(Some(serde_json::from_str(&val)?)),
        None => Ok(None),
    }
}

/// Returns false when there was no session for the token.
pub fn remove_session<C: ConnectionLike>(redis_conn: &mut C, token: &str) -> anyhow::Result<bool> {
    let removed: i64 = redis::cmd("del").arg(token).query(redis_conn)?;
    Ok(removed > 0)
}
