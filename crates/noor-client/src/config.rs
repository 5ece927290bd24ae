pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_APP_NAME: &str = "NoorAI";

/// Client-side settings. The defaults are embedded at build time from
/// `NOOR_API_BASE_URL` and `NOOR_APP_NAME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub app_name: String,
}

impl ClientConfig {
    pub fn embedded() -> Self {
        Self::new(option_env!("NOOR_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL))
            .with_app_name(option_env!("NOOR_APP_NAME").unwrap_or(DEFAULT_APP_NAME))
    }

    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            app_name: DEFAULT_APP_NAME.into(),
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::embedded()
    }
}
