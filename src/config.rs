use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:5000";
pub const DEFAULT_STORAGE_PATH: &str = ".portal-session.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub ai_service_url: String,
    pub storage_path: PathBuf,
    pub request_timeout: Option<Duration>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(_) => Some(Duration::from_secs(get_env_parse("REQUEST_TIMEOUT_SECS")?)),
            Err(_) => None,
        };

        Ok(Self {
            api_base_url: base_url(get_env("PORTAL_API_BASE_URL")?)?,
            ai_service_url: base_url(
                env::var("AI_SERVICE_URL").unwrap_or_else(|_| DEFAULT_AI_SERVICE_URL.to_string()),
            )?,
            storage_path: env::var("PORTAL_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string())
                .into(),
            request_timeout,
        })
    }

    pub fn new(api_base_url: &str, ai_service_url: &str) -> Result<Self> {
        Ok(Self {
            api_base_url: base_url(api_base_url.to_string())?,
            ai_service_url: base_url(ai_service_url.to_string())?,
            storage_path: DEFAULT_STORAGE_PATH.into(),
            request_timeout: None,
        })
    }
}

// Accepts only absolute http(s) URLs and drops trailing slashes so paths can be appended.
fn base_url(raw: String) -> Result<String> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("Invalid base URL {}: {}", raw, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "Unsupported URL scheme for {}: {}",
            raw,
            parsed.scheme()
        )));
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
