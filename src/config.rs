use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Environment: development, production, test
    pub environment: String,

    /// Session inactivity window in hours (default: 24). Each successful
    /// cookie lookup slides a session's expiry forward by this much.
    pub session_ttl_hours: i64,

    /// Image color-recognition service settings. `None` disables the
    /// feature entirely; project views then simply omit the palette.
    pub color_api: Option<ColorApiConfig>,
}

/// Settings for the third-party color-recognition call. All identifiers and
/// the key are supplied at deployment; nothing is compiled in.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub app_id: String,
    pub model_id: String,
    pub model_version: String,
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        Ok(Config {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            session_ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            color_api: Self::color_api_from_env(),
        })
    }

    /// The color API is configured only when a key is present; partial
    /// settings are treated as disabled rather than an error.
    fn color_api_from_env() -> Option<ColorApiConfig> {
        let api_key = std::env::var("COLOR_API_KEY").ok()?;
        let user_id = std::env::var("COLOR_API_USER_ID").ok()?;
        let app_id = std::env::var("COLOR_API_APP_ID").ok()?;
        let model_version = std::env::var("COLOR_API_MODEL_VERSION").ok()?;

        Some(ColorApiConfig {
            base_url: std::env::var("COLOR_API_URL")
                .unwrap_or_else(|_| "https://api.clarifai.com".to_string()),
            api_key,
            user_id,
            app_id,
            model_id: std::env::var("COLOR_API_MODEL_ID")
                .unwrap_or_else(|_| "color-recognition".to_string()),
            model_version,
        })
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }
}
