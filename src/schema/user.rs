use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::{
    core::utils::datetime_to_string,
    model::{profile::Profile, role::Role, user::User},
};

use super::{
    common::{Envelope, FailedEnvelope},
    role::RoleResponse,
};

#[derive(Object, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub lastname: String,
    pub phone: String,
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            name: profile.name.clone(),
            lastname: profile.lastname.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
            created_at: datetime_to_string(profile.created_at),
            updated_at: datetime_to_string(profile.updated_at),
        }
    }
}

/// User without relations. The password hash is never exposed.
#[derive(Object, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub active: bool,
    pub role_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            active: user.active,
            role_id: user.role_id,
            created_at: datetime_to_string(user.created_at),
            updated_at: datetime_to_string(user.updated_at),
        }
    }
}

/// User with profile and role eager-loaded.
#[derive(Object, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserDetailResponse {
    pub id: i32,
    pub email: String,
    pub active: bool,
    pub role_id: i32,
    pub created_at: String,
    pub updated_at: String,
    pub profile: Option<ProfileResponse>,
    pub role: Option<RoleResponse>,
}

impl UserDetailResponse {
    pub fn new(user: &User, profile: Option<&Profile>, role: Option<&Role>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            active: user.active,
            role_id: user.role_id,
            created_at: datetime_to_string(user.created_at),
            updated_at: datetime_to_string(user.updated_at),
            profile: profile.map(ProfileResponse::from),
            role: role.map(RoleResponse::from),
        }
    }
}

#[derive(Object, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserProfileResponse {
    pub user: UserResponse,
    pub profile: ProfileResponse,
}

#[derive(ApiResponse)]
pub enum UserListResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<Vec<UserDetailResponse>>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

#[derive(ApiResponse)]
pub enum UserDetailResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<UserDetailResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

#[derive(ApiResponse)]
pub enum UserCreateResponses {
    #[oai(status = 201)]
    Created(Json<Envelope<UserProfileResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

#[derive(ApiResponse)]
pub enum UserUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<UserProfileResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

/// Response of the active toggle (`DELETE /users/:id`).
#[derive(ApiResponse)]
pub enum UserStatusResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<UserResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

#[derive(ApiResponse)]
pub enum CurrentUserResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<UserResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 401)]
    Unauthorized(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

impl_failure_responses!(
    UserListResponses,
    UserDetailResponses,
    UserCreateResponses,
    UserUpdateResponses,
    UserStatusResponses,
    CurrentUserResponses,
);
