use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, parsed from `SITEKIT_ALLOWED_ORIGINS` (comma-separated).
    /// When empty, any origin is allowed (dev convenience).
    pub allowed_origins: Vec<String>,
    /// Base URL media links are built against, e.g. `https://cms.example.com`.
    pub public_url: String,
    /// Deployment environment name; error details are only exposed outside "production".
    pub environment: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let allowed_origins = env::var("SITEKIT_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let port = env::var("SITEKIT_API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self {
            host: env::var("SITEKIT_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            allowed_origins,
            public_url: env::var("SITEKIT_PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            environment: env::var("SITEKIT_ENV").unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
