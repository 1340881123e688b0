use std::sync::Arc;

use chrono::{Duration, Utc};
use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::{
    core::{
        error::{render_failure, ControllerError},
        security::{
            generate_token_from_user, get_user_from_token, verify_hash_password,
            BearerAuthorization,
        },
        session::{add_session, remove_session},
        utils::datetime_to_string,
    },
    i18n::Locale,
    repository::user::get_user_by_email,
    schema::auth::{LoginRequest, LoginResponse, LoginResponses, LogoutResponses},
    AppState,
};

const ROUTE: &str = "route.auth";

/// Check the credentials and open a session for the issued token.
/// Unknown email, wrong password and inactive users are all the same rejection.
pub async fn login(state: &AppState, req: &LoginRequest) -> Result<LoginResponse, ControllerError> {
    let invalid = ControllerError::Rejected("messages.errors.credentials");
    let mut tx = state.db.begin().await?;
    let Some(user) = get_user_by_email(&mut tx, &req.email).await? else {
        return Err(invalid);
    };
    tx.commit().await?;
    let is_valid = verify_hash_password(&req.password, &user.password)
        .map_err(|err| anyhow::anyhow!("verify password: {}", err))?;
    if !is_valid || !user.active {
        return Err(invalid);
    }

    let config = &state.config;
    let token = generate_token_from_user(&user, config)?;
    let mut redis_conn = state.redis_conn.get().map_err(anyhow::Error::from)?;
    add_session(&mut *redis_conn, &user, config, &token)?;
    let exp_in = config.jwt_exp as i64 * 60;
    let exp = Utc::now() + Duration::seconds(exp_in);
    Ok(LoginResponse {
        exp: datetime_to_string(exp.fixed_offset()),
        exp_in,
        token,
        token_type: "Bearer".to_string(),
    })
}

/// Drop the session behind the token. `false` when it was not a live session.
pub async fn logout(state: &AppState, token: Option<String>) -> Result<bool, ControllerError> {
    let mut tx = state.db.begin().await?;
    let mut redis_conn = state.redis_conn.get().map_err(anyhow::Error::from)?;
    let user =
        get_user_from_token(&mut tx, &mut *redis_conn, &state.config, token.clone()).await?;
    tx.commit().await?;
    match (user, token) {
        (Some(_), Some(token)) => Ok(remove_session(&mut *redis_conn, &token)?),
        _ => Ok(false),
    }
}

#[derive(Tags)]
enum ApiAuthTags {
    Auth,
}

pub struct ApiAuth;

#[OpenApi]
impl ApiAuth {
    #[oai(path = "/auth/login", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_login(
        &self,
        Json(req): Json<LoginRequest>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> LoginResponses {
        let lang = state.i18n.lang(locale.clone());
        match login(&state, &req).await {
            Ok(data) => LoginResponses::Ok(Json(lang.format(
                lang.message("messages.success.login"),
                lang.successful(),
                Some(data),
            ))),
            Err(err) => render_failure(&lang, ROUTE, "auth_login", err, false),
        }
    }

    #[oai(path = "/auth/logout", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_logout(
        &self,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
        auth: BearerAuthorization,
    ) -> LogoutResponses {
        let lang = state.i18n.lang(locale.clone());
        match logout(&state, auth.0.token).await {
            Ok(true) => LogoutResponses::Ok(Json(lang.format(
                lang.message("messages.success.logout"),
                lang.successful(),
                None,
            ))),
            Ok(false) => LogoutResponses::Unauthorized(Json(
                lang.failure(lang.message("messages.errors.unauthorized")),
            )),
            Err(err) => render_failure(&lang, ROUTE, "auth_logout", err, false),
        }
    }
}
