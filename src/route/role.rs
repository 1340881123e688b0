use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    core::error::{render_failure, ControllerError},
    i18n::Locale,
    model::role::Role,
    repository::{
        role::{create_role, get_role_by_id, get_roles, toggle_role_active, update_role},
        user::get_users_by_role_ids,
    },
    schema::role::{
        RoleCreateResponses, RoleDetailResponse, RoleDetailResponses, RoleListResponses,
        RoleResponse, RoleStatusResponses, RoleUpdateResponses,
    },
    validator::{role::RoleValidator, Validator},
    AppState,
};

use super::parse_id;

const ROUTE: &str = "route.role";

/// Roles with their users, ascending by id.
pub async fn load_roles(
    db: &PgPool,
    id: Option<i32>,
) -> Result<Vec<RoleDetailResponse>, ControllerError> {
    let mut tx = db.begin().await?;
    let roles = get_roles(&mut tx, id).await?;
    let role_ids: Vec<i32> = roles.iter().map(|x| x.id).collect();
    let users = get_users_by_role_ids(&mut tx, &role_ids).await?;
    tx.commit().await?;
    Ok(roles
        .iter()
        .map(|x| RoleDetailResponse::new(x, &users))
        .collect())
}

pub async fn find_role(db: &PgPool, id: &str) -> Result<RoleDetailResponse, ControllerError> {
    let id = parse_id(id, "role")?;
    load_roles(db, Some(id))
        .await?
        .into_iter()
        .next()
        .ok_or(ControllerError::NotFound("role"))
}

pub async fn store_role(db: &PgPool, payload: &Value) -> Result<Role, ControllerError> {
    let data = RoleValidator::validate(payload)?;
    let mut tx = db.begin().await?;
    let role = create_role(&mut tx, data.name, data.description, data.active, None).await?;
    tx.commit().await?;
    Ok(role)
}

pub async fn modify_role(db: &PgPool, id: &str, payload: &Value) -> Result<Role, ControllerError> {
    let id = parse_id(id, "role")?;
    let mut tx = db.begin().await?;
    let mut role = get_role_by_id(&mut tx, id)
        .await?
        .ok_or(ControllerError::NotFound("role"))?;
    let data = RoleValidator::validate(payload)?;
    update_role(
        &mut tx,
        &mut role,
        data.name,
        data.description,
        data.active,
        None,
    )
    .await?;
    tx.commit().await?;
    Ok(role)
}

/// Flip `active`; this is what "delete" means for roles.
pub async fn switch_role(db: &PgPool, id: &str) -> Result<Role, ControllerError> {
    let id = parse_id(id, "role")?;
    let mut tx = db.begin().await?;
    let mut role = get_role_by_id(&mut tx, id)
        .await?
        .ok_or(ControllerError::NotFound("role"))?;
    toggle_role_active(&mut tx, &mut role, None).await?;
    tx.commit().await?;
    Ok(role)
}

#[derive(Tags)]
enum ApiRoleTags {
    Role,
}

pub struct ApiRole;

#[OpenApi]
impl ApiRole {
    #[oai(path = "/roles", method = "get", tag = "ApiRoleTags::Role")]
    async fn get_roles_api(
        &self,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> RoleListResponses {
        let lang = state.i18n.lang(locale.clone());
        match load_roles(&state.db, None).await {
            Ok(data) => RoleListResponses::Ok(Json(lang.success(
                "messages.success.all",
                "roles",
                data,
            ))),
            Err(err) => render_failure(&lang, ROUTE, "get_roles_api", err, false),
        }
    }

    #[oai(path = "/roles/:id", method = "get", tag = "ApiRoleTags::Role")]
    async fn get_role_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> RoleDetailResponses {
        let lang = state.i18n.lang(locale.clone());
        match find_role(&state.db, &id).await {
            Ok(data) => RoleDetailResponses::Ok(Json(lang.success(
                "messages.success.one",
                "role",
                data,
            ))),
            Err(err) => render_failure(&lang, ROUTE, "get_role_api", err, false),
        }
    }

    #[oai(path = "/roles", method = "post", tag = "ApiRoleTags::Role")]
    async fn create_role_api(
        &self,
        Json(payload): Json<Value>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> RoleCreateResponses {
        let lang = state.i18n.lang(locale.clone());
        match store_role(&state.db, &payload).await {
            Ok(role) => RoleCreateResponses::Ok(Json(lang.success(
                "messages.success.create",
                "role",
                RoleResponse::from(&role),
            ))),
            Err(err) => render_failure(&lang, ROUTE, "create_role_api", err, false),
        }
    }

    #[oai(path = "/roles/:id", method = "put", tag = "ApiRoleTags::Role")]
    async fn update_role_api(
        &self,
        Path(id): Path<String>,
        Json(payload): Json<Value>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> RoleUpdateResponses {
        let lang = state.i18n.lang(locale.clone());
        match modify_role(&state.db, &id, &payload).await {
            Ok(role) => RoleUpdateResponses::Ok(Json(lang.success(
                "messages.success.update",
                "role",
                RoleResponse::from(&role),
            ))),
            Err(err) => render_failure(&lang, ROUTE, "update_role_api", err, false),
        }
    }

    #[oai(path = "/roles/:id", method = "patch", tag = "ApiRoleTags::Role")]
    async fn toggle_role_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> RoleStatusResponses {
        self.switch_role_response(&id, &state, locale, "toggle_role_api")
            .await
    }

    /// Same toggle as `PATCH`. Nothing is removed.
    #[oai(path = "/roles/:id", method = "delete", tag = "ApiRoleTags::Role")]
    async fn delete_role_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
        Data(locale): Data<&Locale>,
    ) -> RoleStatusResponses {
        self.switch_role_response(&id, &state, locale, "delete_role_api")
            .await
    }
}

impl ApiRole {
    async fn switch_role_response(
        &self,
        id: &str,
        state: &Arc<AppState>,
        locale: &Locale,
        action: &str,
    ) -> RoleStatusResponses {
        let lang = state.i18n.lang(locale.clone());
        match switch_role(&state.db, id).await {
            Ok(role) => RoleStatusResponses::Ok(Json(lang.success(
                "messages.success.status",
                "role",
                RoleResponse::from(&role),
            ))),
            Err(err) => render_failure(&lang, ROUTE, action, err, false),
        }
    }
}
