use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use beauty_control_application::BUSINESS_ACCESS_CACHE_TTL_SECONDS;
use beauty_control_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_API_PORT: u16 = 3002;
const DEFAULT_BUSINESS_API_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_SESSION_IDLE_MINUTES: u32 = 30;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub business_api_base_url: Url,
    pub business_access_cache_ttl_seconds: u32,
    pub business_api_timeout: Duration,
    pub session_cookie_secure: bool,
    pub session_idle_minutes: u32,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_or("API_PORT", lookup("API_PORT"), DEFAULT_API_PORT)?;
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let business_api_base_url = lookup("BUSINESS_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("BUSINESS_API_BASE_URL is required".to_owned()))
            .and_then(|value| parse_base_url(value.as_str()))?;

        let business_access_cache_ttl_seconds = parse_or(
            "BUSINESS_ACCESS_CACHE_TTL_SECONDS",
            lookup("BUSINESS_ACCESS_CACHE_TTL_SECONDS"),
            BUSINESS_ACCESS_CACHE_TTL_SECONDS,
        )?;
        let timeout_seconds = parse_or(
            "BUSINESS_API_TIMEOUT_SECONDS",
            lookup("BUSINESS_API_TIMEOUT_SECONDS"),
            DEFAULT_BUSINESS_API_TIMEOUT_SECONDS,
        )?;
        if timeout_seconds == 0 {
            return Err(AppError::Validation(
                "BUSINESS_API_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        let session_cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");
        let session_idle_minutes = parse_or(
            "SESSION_IDLE_MINUTES",
            lookup("SESSION_IDLE_MINUTES"),
            DEFAULT_SESSION_IDLE_MINUTES,
        )?;
        if session_idle_minutes == 0 {
            return Err(AppError::Validation(
                "SESSION_IDLE_MINUTES must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            business_api_base_url,
            business_access_cache_ttl_seconds,
            business_api_timeout: Duration::from_secs(timeout_seconds),
            session_cookie_secure,
            session_idle_minutes,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.session_idle_minutes) * 60)
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        None => Ok(default),
    }
}

/// Parses the backend base URL, forcing a trailing slash so relative
/// endpoint paths join below it.
fn parse_base_url(value: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(value.trim()).map_err(|error| {
        AppError::Validation(format!("invalid BUSINESS_API_BASE_URL '{value}': {error}"))
    })?;

    if url.cannot_be_a_base() {
        return Err(AppError::Validation(format!(
            "BUSINESS_API_BASE_URL '{value}' cannot be used as a base url"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(path.as_str());
    }

    Ok(url)
}
