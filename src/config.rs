use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_access_ttl_minutes: i64,
    pub jwt_refresh_ttl_days: i64,
    pub api_rps: u32,
    pub uploads_dir: String,
    pub platform: PlatformSettings,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Values reported by the admin system-settings endpoint.
#[derive(Debug, Clone)]
pub struct PlatformSettings {
    pub platform_name: String,
    pub contact_email: String,
    pub service_phone: String,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub phone: String,
    pub password: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_PHONE").ok(),
            env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
        ) {
            (Some(phone), Some(password)) => Some(BootstrapAdmin { phone, password }),
            _ => None,
        };

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_access_ttl_minutes: get_env_parse_or("JWT_ACCESS_TTL_MINUTES", 60)?,
            jwt_refresh_ttl_days: get_env_parse_or("JWT_REFRESH_TTL_DAYS", 7)?,
            api_rps: get_env_parse_or("API_RPS", 200)?,
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            platform: PlatformSettings {
                platform_name: env::var("PLATFORM_NAME")
                    .unwrap_or_else(|_| "Student Employment Platform".to_string()),
                contact_email: env::var("PLATFORM_CONTACT_EMAIL")
                    .unwrap_or_else(|_| "admin@example.com".to_string()),
                service_phone: env::var("PLATFORM_SERVICE_PHONE")
                    .unwrap_or_else(|_| "400-123-4567".to_string()),
            },
            bootstrap_admin,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
