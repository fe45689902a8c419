//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::application::messaging::DispatchOptions;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub catalogue: CatalogueConfig,
    pub server: ServerConfig,
    pub features: FeatureConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    /// Target of the "Request Movie" button
    pub request_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub admin_id: Option<i64>,
    pub api_base: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CatalogueConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL registered with Telegram via setWebhook
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FeatureConfig {
    pub loading_placeholder: bool,
    pub search_command: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "cinebot".to_string(),
            prefix: "/".to_string(),
            request_url: "https://t.me/anonyms_middle_man_bot".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            admin_id: None,
            api_base: "https://api.telegram.org".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            public_url: None,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            loading_placeholder: true,
            search_command: true,
        }
    }
}

/// The three values the bot cannot start without
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Required {
    pub token: String,
    pub admin_id: i64,
    pub catalogue_url: String,
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Override fields from `BOT_TOKEN`, `ADMIN_USER_ID`, `JSON_URL`, `PORT`
    /// and `WEBHOOK_URL`. `lookup` is `std::env::var` outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("BOT_TOKEN") {
            self.telegram.token = Some(token);
        }

        if let Some(admin) = lookup("ADMIN_USER_ID") {
            let admin_id = admin.trim().parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue(format!("ADMIN_USER_ID is not an integer: {}", admin)))?;
            self.telegram.admin_id = Some(admin_id);
        }

        if let Some(url) = lookup("JSON_URL") {
            self.catalogue.url = Some(url);
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT is not a valid port: {}", port)))?;
        }

        if let Some(url) = lookup("WEBHOOK_URL") {
            self.server.public_url = Some(url);
        }

        if let Some(prefix) = lookup("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        Ok(())
    }

    /// Check that token, admin id and catalogue URL are all present
    pub fn validate(&self) -> Result<Required, ConfigError> {
        let token = self.telegram.token.clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("telegram.token (BOT_TOKEN)".to_string()))?;
        let admin_id = self.telegram.admin_id
            .ok_or_else(|| ConfigError::MissingField("telegram.admin-id (ADMIN_USER_ID)".to_string()))?;
        let catalogue_url = self.catalogue.url.clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("catalogue.url (JSON_URL)".to_string()))?;

        Ok(Required { token, admin_id, catalogue_url })
    }

    pub fn dispatch_options(&self, admin_id: i64) -> DispatchOptions {
        DispatchOptions {
            admin_id,
            loading_placeholder: self.features.loading_placeholder,
            search_command: self.features.search_command,
            request_url: self.bot.request_url.clone(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.bot.prefix, "/");
        assert!(config.features.loading_placeholder);
        assert!(config.features.search_command);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = Config::from_yaml(
            "telegram:\n  token: abc\n  admin-id: 111\ncatalogue:\n  url: https://example.com/movies.json\nfeatures:\n  loading-placeholder: false\n",
        )
        .unwrap();

        assert_eq!(config.telegram.token.as_deref(), Some("abc"));
        assert_eq!(config.telegram.admin_id, Some(111));
        assert!(!config.features.loading_placeholder);
        assert!(config.features.search_command);
        assert_eq!(config.telegram.api_base, "https://api.telegram.org");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("BOT_TOKEN", "123:xyz"),
                ("ADMIN_USER_ID", "111"),
                ("JSON_URL", "https://example.com/m.json"),
                ("PORT", "9090"),
            ]))
            .unwrap();

        let required = config.validate().unwrap();
        assert_eq!(required.token, "123:xyz");
        assert_eq!(required.admin_id, 111);
        assert_eq!(required.catalogue_url, "https://example.com/m.json");
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
    }

    #[test]
    fn test_bad_admin_id_is_rejected() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("ADMIN_USER_ID", "admin")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_validate_reports_missing_field() {
        let mut config = Config::default();
        config.telegram.token = Some("abc".to_string());
        config.telegram.admin_id = Some(1);

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(field) if field.contains("catalogue.url")));
    }
}
