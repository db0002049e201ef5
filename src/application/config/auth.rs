use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens. When unset, a random secret is
    /// generated at startup and tokens do not survive a restart.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in hours.
    pub token_ttl_hours: i64,
    /// Credentials used to seed the super admin account on first start.
    pub super_admin_email: String,
    pub super_admin_password: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env::var("SITEKIT_JWT_SECRET").ok().filter(|s| !s.is_empty()),
            token_ttl_hours: env::var("SITEKIT_TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            super_admin_email: env::var("SITEKIT_SUPER_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@sitekit.local".to_string()),
            super_admin_password: env::var("SITEKIT_SUPER_ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}
