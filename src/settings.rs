use std::env;

use serde::Deserialize;
use tracing::info;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub env: String, // file / server
    #[serde(default = "default_app_env")]
    pub app_env: String, // development / production
    pub host: String,
    pub port: u16,
    pub prefix: Option<String>,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_exp: u16,
    pub redis_url: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    pub supported_locales: Option<Vec<String>>,
    pub log_level: Option<String>,
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

pub fn get_config() -> Config {
    let env_var = env::var("env").unwrap_or("file".to_string());
    if env_var == "file" {
        info!("using .env file as environtment variable");
        let _ = dotenvy::dotenv();
    } else {
        info!("using server environtment as environtment variable");
    }
    envy::from_env::<Config>().expect("invalid environment configuration")
}
