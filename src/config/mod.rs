use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub oauth: OAuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Failed login attempts before the account locks
    pub max_failed_logins: u32,
    /// How long a locked account stays locked
    pub lockout_minutes: u64,
    pub min_password_length: usize,
}

/// External sign-in providers. A provider with no client id/secret configured
/// is simply disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Public base URL the provider redirects back to, e.g. "https://app.example.com".
    /// Behind a TLS-terminating proxy this is how the callback keeps its https scheme.
    pub redirect_base: String,
    pub google: Option<OAuthProvider>,
    pub facebook: Option<OAuthProvider>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProvider {
    pub client_id: String,
    pub client_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("MAX_FAILED_LOGINS") {
            self.security.max_failed_logins = v.parse().unwrap_or(self.security.max_failed_logins);
        }
        if let Ok(v) = env::var("LOCKOUT_MINUTES") {
            self.security.lockout_minutes = v.parse().unwrap_or(self.security.lockout_minutes);
        }
        if let Ok(v) = env::var("MIN_PASSWORD_LENGTH") {
            self.security.min_password_length =
                v.parse().unwrap_or(self.security.min_password_length);
        }

        // OAuth overrides
        if let Ok(v) = env::var("OAUTH_REDIRECT_BASE") {
            self.oauth.redirect_base = v;
        }
        self.oauth.google = Self::provider_from_env("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET")
            .or(self.oauth.google);
        self.oauth.facebook =
            Self::provider_from_env("FACEBOOK_CLIENT_ID", "FACEBOOK_CLIENT_SECRET")
                .or(self.oauth.facebook);

        self
    }

    fn provider_from_env(id_var: &str, secret_var: &str) -> Option<OAuthProvider> {
        match (env::var(id_var), env::var(secret_var)) {
            (Ok(client_id), Ok(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(OAuthProvider { client_id, client_secret })
            }
            _ => None,
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig { max_connections: 10, connection_timeout: 30 },
            security: SecurityConfig {
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                max_failed_logins: 5,
                lockout_minutes: 15,
                min_password_length: 6,
            },
            oauth: OAuthConfig {
                redirect_base: "http://localhost:3000".to_string(),
                google: None,
                facebook: None,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig { max_connections: 20, connection_timeout: 10 },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 24,
                max_failed_logins: 5,
                lockout_minutes: 15,
                min_password_length: 8,
            },
            oauth: OAuthConfig {
                redirect_base: "https://staging.example.com".to_string(),
                google: None,
                facebook: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig { max_connections: 50, connection_timeout: 5 },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 4,
                max_failed_logins: 5,
                lockout_minutes: 30,
                min_password_length: 8,
            },
            oauth: OAuthConfig {
                redirect_base: "https://app.example.com".to_string(),
                google: None,
                facebook: None,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
