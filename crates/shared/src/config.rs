use std::time::Duration;

use thiserror::Error;

use crate::config_env::{
    optional_trimmed_env, parse_f32_env, parse_u32_env, parse_u64_env, parse_usize_env,
    require_env,
};
use crate::health_assistant::{ConversationLimits, ResponderSettings};
use crate::llm::{OpenAiConfigError, OpenAiGatewayConfig};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub chat: ChatConfig,
    pub openai: Option<OpenAiGatewayConfig>,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub history_max_exchanges: usize,
    pub max_tracked_callers: usize,
    pub caller_idle_ttl_seconds: u64,
    pub caller_prune_interval_seconds: u64,
    pub llm_max_tokens: u32,
    pub llm_temperature: f32,
    pub llm_timeout_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_max_exchanges: 10,
            max_tracked_callers: 10_000,
            caller_idle_ttl_seconds: 3600,
            caller_prune_interval_seconds: 300,
            llm_max_tokens: 500,
            llm_temperature: 0.7,
            llm_timeout_ms: 20_000,
        }
    }
}

impl ChatConfig {
    pub fn conversation_limits(&self) -> ConversationLimits {
        ConversationLimits {
            max_exchanges: self.history_max_exchanges,
            max_callers: self.max_tracked_callers,
            idle_ttl: Duration::from_secs(self.caller_idle_ttl_seconds),
        }
    }

    pub fn responder_settings(&self) -> ResponderSettings {
        ResponderSettings {
            max_tokens: self.llm_max_tokens,
            temperature: self.llm_temperature,
            llm_timeout: Duration::from_millis(self.llm_timeout_ms),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            history_max_exchanges: parse_usize_env(
                "CHAT_HISTORY_MAX_EXCHANGES",
                defaults.history_max_exchanges,
            )?,
            max_tracked_callers: parse_usize_env(
                "CHAT_MAX_TRACKED_CALLERS",
                defaults.max_tracked_callers,
            )?,
            caller_idle_ttl_seconds: parse_u64_env(
                "CHAT_CALLER_IDLE_TTL_SECONDS",
                defaults.caller_idle_ttl_seconds,
            )?,
            caller_prune_interval_seconds: parse_u64_env(
                "CHAT_CALLER_PRUNE_INTERVAL_SECONDS",
                defaults.caller_prune_interval_seconds,
            )?,
            llm_max_tokens: parse_u32_env("CHAT_LLM_MAX_TOKENS", defaults.llm_max_tokens)?,
            llm_temperature: parse_f32_env("CHAT_LLM_TEMPERATURE", defaults.llm_temperature)?,
            llm_timeout_ms: parse_u64_env("CHAT_LLM_TIMEOUT_MS", defaults.llm_timeout_ms)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_max_exchanges == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "CHAT_HISTORY_MAX_EXCHANGES must be at least 1".to_string(),
            ));
        }
        if self.max_tracked_callers == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "CHAT_MAX_TRACKED_CALLERS must be at least 1".to_string(),
            ));
        }
        if self.caller_prune_interval_seconds == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "CHAT_CALLER_PRUNE_INTERVAL_SECONDS must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::InvalidConfiguration(
                "CHAT_LLM_TEMPERATURE must be between 0 and 2".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid number in env var {0}")]
    ParseFloat(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
    #[error(transparent)]
    OpenAi(#[from] OpenAiConfigError),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: optional_trimmed_env("API_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: optional_trimmed_env("DATABASE_URL"),
            database_max_connections: parse_u32_env("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: require_env("JWT_SECRET")?,
            chat: ChatConfig::from_env()?,
            openai: OpenAiGatewayConfig::from_env()?,
        })
    }
}

/// Loads `.env` from the working directory when present; a missing file is not an error.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatConfig, ConfigError};

    #[test]
    fn default_chat_config_keeps_ten_exchanges() {
        let config = ChatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.conversation_limits().max_exchanges, 10);
        assert_eq!(config.responder_settings().max_tokens, 500);
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let config = ChatConfig {
            llm_temperature: 3.5,
            ..ChatConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfiguration(message)) if message.contains("TEMPERATURE")
        ));
    }

    #[test]
    fn rejects_zero_history_depth() {
        let config = ChatConfig {
            history_max_exchanges: 0,
            ..ChatConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
