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
    pub cors_origin: String,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max: u32,
    pub otp_ttl_minutes: i64,
    pub uploads_dir: String,
    pub sms_gateway_url: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_or("DATABASE_MAX_CONNECTIONS", 20)?,
            jwt_secret: get_env("JWT_SECRET")?,
            cors_origin: get_env("CORS_ORIGIN")?,
            rate_limit_window_secs: get_env_or("RATE_LIMIT_WINDOW_SECS", 900)?,
            rate_limit_max: get_env_or("RATE_LIMIT_MAX", 100)?,
            otp_ttl_minutes: get_env_or("OTP_TTL_MINUTES", 10)?,
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            sms_gateway_url: env::var("SMS_GATEWAY_URL").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or<T>(name: &str, default: T) -> Result<T>
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_env_or_falls_back_to_default() {
        let value: u32 = get_env_or("LABOURLINK_UNSET_TEST_VAR", 20).unwrap();
        assert_eq!(value, 20);
    }

    #[test]
    fn get_env_or_rejects_unparseable_values() {
        env::set_var("LABOURLINK_BAD_POOL_SIZE", "plenty");
        let result: Result<u32> = get_env_or("LABOURLINK_BAD_POOL_SIZE", 20);
        assert!(result.is_err());
    }
}
