use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::{
    core::utils::datetime_to_string,
    model::{role::Role, user::User},
};

use super::common::{Envelope, FailedEnvelope};

#[derive(Object, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            description: role.description.clone(),
            active: role.active,
            created_at: datetime_to_string(role.created_at),
            updated_at: datetime_to_string(role.updated_at),
        }
    }
}

#[derive(Object, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RoleUserResponse {
    pub id: i32,
    pub email: String,
    pub active: bool,
}

impl From<&User> for RoleUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            active: user.active,
        }
    }
}

/// Role with its users eager-loaded.
#[derive(Object, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RoleDetailResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub users: Vec<RoleUserResponse>,
}

impl RoleDetailResponse {
    pub fn new(role: &Role, users: &[User]) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            description: role.description.clone(),
            active: role.active,
            created_at: datetime_to_string(role.created_at),
            updated_at: datetime_to_string(role.updated_at),
            users: users
                .iter()
                .filter(|x| x.role_id == role.id)
                .map(RoleUserResponse::from)
                .collect(),
        }
    }
}

#[derive(ApiResponse)]
pub enum RoleListResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<Vec<RoleDetailResponse>>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

#[derive(ApiResponse)]
pub enum RoleDetailResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<RoleDetailResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

#[derive(ApiResponse)]
pub enum RoleCreateResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<RoleResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

#[derive(ApiResponse)]
pub enum RoleUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<RoleResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

/// Response of the active toggle (`PATCH` / `DELETE /roles/:id`).
#[derive(ApiResponse)]
pub enum RoleStatusResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<RoleResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

impl_failure_responses!(
    RoleListResponses,
    RoleDetailResponses,
    RoleCreateResponses,
    RoleUpdateResponses,
    RoleStatusResponses,
);
