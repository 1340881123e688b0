use std::{collections::HashMap, sync::Arc};

use poem::web::Data;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    core::{
        error::{render_failure, ControllerError},
        security::{get_user_from_token, hash_password, BearerAuthorization},
    },
    i18n::Locale,
    model::{profile::Profile, role::Role, user::User},
    repository::{
        profile::{create_profile, get_profile_by_user_id, get_profiles_by_user_ids, update_profile},
        role::{get_role_by_id, get_roles_by_ids},
        user::{
            create_user, get_user_by_email, get_user_by_id, get_users, toggle_user_active,
            update_user,
        },
    },
    schema::user::{
        CurrentUserResponses, ProfileResponse, UserCreateResponses, UserDetailResponse,
        UserDetailResponses, UserListResponses, UserProfileResponse, UserResponse,
        UserStatusResponses, UserUpdateResponses,
    },
    validator::{
        user::{RegisterValidator, UpdateValidator},
        Validator,
    },
    AppState,
};

use super::parse_id;

const ROUTE: &str = "route.user";

fn hash(password: &str) -> Result<String, ControllerError> {
    hash_password(password).map_err(|err| anyhow::anyhow!("hash password: {}", err).into())
}

/// Users with profile and role, newest first.
pub async fn load_users(
    db: &PgPool,
    id: Option<i32>,
) -> Result<Vec<UserDetailResponse>, ControllerError> {
    let mut tx = db.begin().await?;
    let users = get_users(&mut tx, id).await?;
    let user_ids: Vec<i32> = users.iter().map(|x| x.id).collect();
    let mut role_ids: Vec<i32> = users.iter().map(|x| x.role_id).collect();
    role_ids.sort_unstable();
    role_ids.dedup();
    let profiles = get_profiles_by_user_ids(&mut tx, &user_ids).await?;
    let roles = get_roles_by_ids(&mut tx, &role_ids).await?;
    tx.commit().await?;
    let profiles: HashMap<i32, &Profile> = profiles.iter().map(|x| (x.user_id, x)).collect();
    let roles: HashMap<i32, &Role> = roles.iter().map(|x| (x.id, x)).collect();
    Ok(users
        .iter()
        .map(|x| {
            UserDetailResponse::new(
                x,
                profiles.get(&x.id).copied(),
                roles.get(&x.role_id).copied(),
            )
        })
        .collect())
}

pub async fn find_user(db: &PgPool, id: &str) -> Result<UserDetailResponse, ControllerError> {
    let id = parse_id(id, "user")?;
    load_users(db, Some(id))
        .await?
        .into_iter()
        .next()
        .ok_or(ControllerError::NotFound("user"))
}

/// Register a user and its profile. Nothing is written unless both inserts succeed.
pub async fn store_user(
    db: &PgPool,
    payload: &Value,
) -> Result<UserProfileResponse, ControllerError> {
    let data = RegisterValidator::validate(payload)?;
    let mut tx = db.begin().await?;
    if get_role_by_id(&mut tx, data.role_id).await?.is_none() {
        return Err(ControllerError::NotFound("role"));
    }
    if get_user_by_email(&mut tx, &data.email).await?.is_some() {
        return Err(ControllerError::Conflict);
    }
    let password = hash(&data.password)?;
    let user = create_user(
        &mut tx,
        data.email,
        password,
        data.active,
        data.role_id,
        None,
    )
    .await
    .map_err(ControllerError::from_user_write)?;
    let profile = create_profile(&mut tx, user.id, data.profile, None).await?;
    tx.commit().await?;
    Ok(UserProfileResponse {
        user: UserResponse::from(&user),
        profile: ProfileResponse::from(&profile),
    })
}

pub async fn modify_user(
    db: &PgPool,
    id: &str,
    payload: &Value,
) -> Result<UserProfileResponse, ControllerError> {
    let id = parse_id(id, "user")?;
    let mut tx = db.begin().await?;
    let mut user = get_user_by_id(&mut tx, id)
        .await?
        .ok_or(ControllerError::NotFound("user"))?;
    let data = UpdateValidator::validate(payload)?;
    if get_role_by_id(&mut tx, data.role_id).await?.is_none() {
        return Err(ControllerError::NotFound("role"));
    }
    let mut profile = get_profile_by_user_id(&mut tx, user.id)
        .await?
        .ok_or(ControllerError::NotFound("user"))?;
    if let Some(other) = get_user_by_email(&mut tx, &data.email).await? {
        if other.id != user.id {
            return Err(ControllerError::Conflict);
        }
    }
    let password = match data.password {
        Some(val) => Some(hash(&val)?),
        None => None,
    };
    update_user(
        &mut tx,
        &mut user,
        data.email,
        password,
        data.active,
        data.role_id,
        None,
    )
    .await
    .map_err(ControllerError::from_user_write)?;
    update_profile(&mut tx, &mut profile, data.profile, None).await?;
    tx.commit().await?;
    Ok(UserProfileResponse {
        user: UserResponse::from(&user),
        profile: ProfileResponse::from(&profile),
    })
}

/// Flip `active`; this is what "delete" means for users.
pub async fn switch_user(db: &PgPool, id: &str) -> Result<User, ControllerError> {
    let id = parse_id(id, "user")?;
    let mut tx = db.begin().await?;
    let mut user = get_user_by_id(&mut tx, id)
        .await?
        .ok_or(ControllerError::NotFound("user"))?;
    toggle_user_active(&mut tx, &mut user, None).await?;
    tx.commit().await?;
    Ok(user)
}

/// `None` when the token has no live session or its user is inactive.
pub async fn current_user(
    state: &AppState,
    token: Option<String>,
) -> Result<Option<User>, ControllerError> {
    let mut tx = state.db.begin().await?;
    let mut redis_conn = state.redis_conn.get().map_err(anyhow::Error::from)?;
    let user = get_user_from_token(&mut tx, &mut *redis_conn, &state.config, token).await?;
    tx.commit().await?;
    Ok(user)
}

#[derive(Tags)]
enum ApiUserTags {
    User,
}

pub struct ApiUser;

#[OpenApi]
impl ApiUser {
    #[oai(path = "/users", method = "get", tag = "ApiUserTags::User")]
    async fn get_users_api(
        &self,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> UserListResponses {
        let lang = state.i18n.lang(locale.clone());
        match load_users(&state.db, None).await {
            Ok(data) => UserListResponses::Ok(Json(lang.success(
                "messages.success.all",
                "users",
                data,
            ))),
            Err(err) => render_failure(&lang, ROUTE, "get_users_api", err, true),
        }
    }

    #[oai(path = "/users/:id", method = "get", tag = "ApiUserTags::User")]
    async fn get_user_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> UserDetailResponses {
        let lang = state.i18n.lang(locale.clone());
        match find_user(&state.db, &id).await {
            Ok(data) => UserDetailResponses::Ok(Json(lang.success(
                "messages.success.one",
                "user",
                data,
            ))),
            Err(err) => render_failure(&lang, ROUTE, "get_user_api", err, true),
        }
    }

    #[oai(path = "/users", method = "post", tag = "ApiUserTags::User")]
    async fn create_user_api(
        &self,
        Json(payload): Json<Value>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> UserCreateResponses {
        let lang = state.i18n.lang(locale.clone());
        match store_user(&state.db, &payload).await {
            Ok(data) => UserCreateResponses::Created(Json(lang.success(
                "messages.success.create",
                "user",
                data,
            ))),
            Err(err) => render_failure(&lang, ROUTE, "create_user_api", err, true),
        }
    }

    #[oai(path = "/users/:id", method = "put", tag = "ApiUserTags::User")]
    async fn update_user_api(
        &self,
        Path(id): Path<String>,
        Json(payload): Json<Value>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> UserUpdateResponses {
        let lang = state.i18n.lang(locale.clone());
        match modify_user(&state.db, &id, &payload).await {
            Ok(data) => UserUpdateResponses::Ok(Json(lang.success(
                "messages.success.update",
                "user",
                data,
            ))),
            Err(err) => render_failure(&lang, ROUTE, "update_user_api", err, true),
        }
    }

    /// Toggles `active`. Nothing is removed.
    #[oai(path = "/users/:id", method = "delete", tag = "ApiUserTags::User")]
    async fn delete_user_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> UserStatusResponses {
        let lang = state.i18n.lang(locale.clone());
        match switch_user(&state.db, &id).await {
            Ok(user) => UserStatusResponses::Ok(Json(lang.success(
                "messages.success.status",
                "user",
                UserResponse::from(&user),
            ))),
            Err(err) => render_failure(&lang, ROUTE, "delete_user_api", err, true),
        }
    }

    /// Only served outside production.
    #[oai(path = "/user", method = "get", tag = "ApiUserTags::User")]
    async fn current_user_api(
        &self,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
        auth: BearerAuthorization,
    ) -> CurrentUserResponses {
        let lang = state.i18n.lang(locale.clone());
        if state.config.is_production() {
            return render_failure(
                &lang,
                ROUTE,
                "current_user_api",
                ControllerError::Rejected("messages.errors.noProd"),
                false,
            );
        }
        match current_user(&state, auth.0.token).await {
            Ok(Some(user)) => CurrentUserResponses::Ok(Json(lang.success(
                "messages.success.authUser",
                "user",
                UserResponse::from(&user),
            ))),
            Ok(None) => CurrentUserResponses::Unauthorized(Json(
                lang.failure(lang.message("messages.errors.unauthorized")),
            )),
            Err(err) => render_failure(&lang, ROUTE, "current_user_api", err, false),
        }
    }
}
