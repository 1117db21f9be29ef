use adala_core::locale::Lang;

use crate::auth::jwt::JwtConfig;

/// Default minimum password length for new and changed passwords.
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 12;

/// Credentials for the first administrator, created at startup when the
/// users table is empty.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development; production overrides via the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Language used when a request names neither `?lang=` nor a supported
    /// `Accept-Language`.
    pub default_lang: Lang,
    pub min_password_length: usize,
    pub bootstrap_admin: Option<AdminBootstrap>,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `DEFAULT_LANG`          | `en`                    |
    /// | `MIN_PASSWORD_LENGTH`   | `12`                    |
    /// | `ADMIN_USERNAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD` | unset |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values, or when only some of the `ADMIN_*`
    /// variables are set.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let default_lang: Lang = std::env::var("DEFAULT_LANG")
            .unwrap_or_else(|_| "en".into())
            .parse()
            .expect("DEFAULT_LANG must be 'en' or 'ar'");

        let min_password_length: usize = std::env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| DEFAULT_MIN_PASSWORD_LENGTH.to_string())
            .parse()
            .expect("MIN_PASSWORD_LENGTH must be a valid usize");

        let bootstrap_admin = admin_from_env();
        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            default_lang,
            min_password_length,
            bootstrap_admin,
            jwt,
        }
    }
}

fn admin_from_env() -> Option<AdminBootstrap> {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    match (var("ADMIN_USERNAME"), var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
        (Some(username), Some(email), Some(password)) => Some(AdminBootstrap {
            username,
            email,
            password,
        }),
        (None, None, None) => None,
        _ => panic!("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
    }
}
