use std::env;

use crate::display::Theme;
use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "https://coursesapiinternship.onrender.com/api";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub theme: Theme,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::Config("API base URL is empty".to_string()));
        }
        Ok(Self {
            base_url,
            theme: Theme::default(),
        })
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_values(env::var("CATALOG_API_URL").ok(), env::var("CATALOG_THEME").ok())
    }

    /// Builds a config from raw `CATALOG_API_URL` / `CATALOG_THEME` values.
    pub fn from_values(base_url: Option<String>, theme: Option<String>) -> Result<Self, AppError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let theme = match theme {
            Some(raw) => raw
                .parse::<Theme>()
                .map_err(|e| AppError::Config(format!("CATALOG_THEME: {}", e)))?,
            None => Theme::default(),
        };

        Ok(Self::new(base_url)?.with_theme(theme))
    }

    /// Replaces the base URL, normalized the same way as [`ApiConfig::new`].
    pub fn with_base_url(self, base_url: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self::new(base_url)?.with_theme(self.theme))
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
