use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::Deserialize;

use super::common::{Envelope, FailedEnvelope};

#[derive(Object, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Object, Deserialize)]
pub struct LoginResponse {
    pub exp: String,
    pub exp_in: i64,
    pub token: String,
    pub token_type: String,
}

#[derive(ApiResponse)]
pub enum LoginResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<LoginResponse>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

#[derive(ApiResponse)]
pub enum LogoutResponses {
    #[oai(status = 200)]
    Ok(Json<Envelope<String>>),

    #[oai(status = 400)]
    BadRequest(Json<FailedEnvelope>),

    #[oai(status = 401)]
    Unauthorized(Json<FailedEnvelope>),

    #[oai(status = 404)]
    NotFound(Json<FailedEnvelope>),
}

impl_failure_responses!(LoginResponses, LogoutResponses);
