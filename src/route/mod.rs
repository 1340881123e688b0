use poem::{
    error::NotFoundError, handler, http::Method, web::Json, Endpoint, IntoResponse, Request,
    Response,
};

use crate::{core::error::ControllerError, schema::common::ServerStatusResponse};

pub mod auth;
#[cfg(test)]
mod auth_test;
pub mod role;
pub mod user;

#[handler]
pub fn server_status() -> Json<ServerStatusResponse> {
    Json(ServerStatusResponse {
        server: "ACTIVE".to_string(),
    })
}

/// Fallback for paths outside the API prefix, rendered by `DetectUserLocale`.
#[handler]
pub fn route_not_found() -> poem::Result<()> {
    Err(NotFoundError.into())
}

/// Catch-all outside the API prefix. `GET /` is the server status and needs
/// no locale; every other path goes to `not_found`.
pub struct Fallback<E> {
    not_found: E,
}

impl<E: Endpoint> Fallback<E> {
    pub fn new(not_found: E) -> Self {
        Self { not_found }
    }
}

impl<E: Endpoint> Endpoint for Fallback<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        if req.method() == Method::GET && req.uri().path().trim_end_matches('/').is_empty() {
            return server_status.call(req).await.map(IntoResponse::into_response);
        }
        self.not_found
            .call(req)
            .await
            .map(IntoResponse::into_response)
    }
}

/// Ids that are not integers can never match a row.
pub(crate) fn parse_id(id: &str, resource: &'static str) -> Result<i32, ControllerError> {
    id.trim()
        .parse::<i32>()
        .map_err(|_| ControllerError::NotFound(resource))
}
