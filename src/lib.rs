use std::sync::Arc;

use i18n::Catalog;
use middleware::locale::DetectUserLocale;
use poem::{
    middleware::{AddData, Cors},
    Endpoint, EndpointExt, IntoEndpoint, Route,
};
use poem_openapi::OpenApiService;
use r2d2::Pool as r2d2Pool;
use redis::Client;
use route::{auth::ApiAuth, role::ApiRole, route_not_found, user::ApiUser, Fallback};
use settings::Config;
use sqlx::{Pool, Postgres};

pub mod cli;
pub mod core;
#[cfg(test)]
pub mod factory;
pub mod i18n;
pub mod middleware;
pub mod model;
pub mod repository;
pub mod route;
pub mod schema;
pub mod settings;
pub mod validator;

pub struct AppState {
    pub db: Pool<Postgres>,
    pub redis_conn: r2d2Pool<Client>,
    pub i18n: Arc<Catalog>,
    pub config: Config,
}

impl AppState {
    /// Load the message catalog restricted to the configured locales.
    pub fn new(
        db: Pool<Postgres>,
        redis_conn: r2d2Pool<Client>,
        config: Config,
    ) -> anyhow::Result<Self> {
        let i18n = Catalog::embedded()?
            .configure(&config.default_locale, config.supported_locales.as_deref())?;
        Ok(Self {
            db,
            redis_conn,
            i18n: Arc::new(i18n),
            config,
        })
    }
}

/// Every API route sits behind `DetectUserLocale`. The server status route,
/// the swagger UI and the OpenAPI document do not.
pub fn init_openapi_route(app_state: Arc<AppState>, config: &Config) -> impl Endpoint {
    let prefix = config.prefix.clone().unwrap_or("/api/v1".to_string());
    let openapi_route = OpenApiService::new((ApiRole, ApiUser, ApiAuth), "User Admin", "1.0")
        .server(prefix.clone());
    let openapi_json_endpoint = openapi_route.spec_endpoint();
    let ui = openapi_route.swagger_ui();
    let locale = DetectUserLocale::new(app_state.i18n.clone());

    let mut route = Route::new()
        .nest(prefix.clone(), openapi_route.into_endpoint().with(locale.clone()))
        .nest("/docs", ui)
        .at("/openapi.json", openapi_json_endpoint);
    if !prefix.trim_end_matches('/').is_empty() {
        route = route
            .at("/", Fallback::new(route_not_found.with(locale.clone())))
            .at("/*path", Fallback::new(route_not_found.with(locale)));
    }
    route.with(AddData::new(app_state)).with(Cors::new())
}
