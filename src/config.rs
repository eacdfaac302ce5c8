use std::env;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://localhost:7070,https://folsme.com,https://www.folsme.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub paystack_secret_key: Option<String>,
    pub paystack_base_url: String,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(10);
        let paystack_secret_key = env::var("PAYSTACK_SECRET_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let paystack_base_url = env::var("PAYSTACK_BASE_URL")
            .unwrap_or_else(|_| "https://api.paystack.co".to_string());
        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );
        Ok(Self {
            port,
            database_url,
            host,
            max_connections,
            jwt_secret,
            paystack_secret_key,
            paystack_base_url,
            cors_origins,
        })
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
