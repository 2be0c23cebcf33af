use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use procura_application::RoleNameMatcher;
use procura_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub backend_api_url: Url,
    pub backend_timeout: Duration,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub session_inactivity_minutes: i64,
    pub redis_url: Option<String>,
    pub role_synonyms: Vec<(String, String)>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let backend_api_url = required_non_empty_env("BACKEND_API_URL")?;
        let backend_api_url = Url::parse(backend_api_url.trim())
            .map_err(|error| AppError::Validation(format!("invalid BACKEND_API_URL: {error}")))?;

        let backend_timeout = Duration::from_secs(parsed_env("BACKEND_TIMEOUT_SECONDS", 10_u64)?);
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parsed_env("API_PORT", 3001_u16)?;
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let session_inactivity_minutes = parsed_env("SESSION_INACTIVITY_MINUTES", 30_i64)?;
        if session_inactivity_minutes <= 0 {
            return Err(AppError::Validation(
                "SESSION_INACTIVITY_MINUTES must be positive".to_owned(),
            ));
        }

        let redis_url = env::var("REDIS_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let role_synonyms = env::var("PORTAL_ROLE_SYNONYMS")
            .ok()
            .map(|value| RoleNameMatcher::parse_synonyms(&value))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            backend_api_url,
            backend_timeout,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            session_inactivity_minutes,
            redis_url,
            role_synonyms,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }

    /// Builds the role-name matcher from the default table plus configured
    /// synonyms.
    pub fn role_name_matcher(&self) -> RoleNameMatcher {
        self.role_synonyms
            .iter()
            .fold(RoleNameMatcher::new(), |matcher, (alias, canonical)| {
                matcher.with_synonym(alias, canonical)
            })
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

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parsed_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        _ => Ok(default),
    }
}
