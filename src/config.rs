//! # Bot Configuration Module
//!
//! Startup settings read from the process environment (optionally seeded
//! from a `.env` file by `main`).

use crate::errors::ConfigError;
use crate::localization::SUPPORTED_LANGUAGES;

/// Environment variable holding the Telegram bot token
pub const TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const DEFAULT_LANGUAGE_VAR: &str = "DEFAULT_LANGUAGE";
pub const REMOVE_ON_RESOLVE_VAR: &str = "REMOVE_ON_RESOLVE";
pub const STRICT_DATE_REPLIES_VAR: &str = "STRICT_DATE_REPLIES";

pub const DEFAULT_LANGUAGE: &str = "en";

/// What happens to a registry entry once its flow is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Drop the entry after a confirmation or a relayed date
    RemoveOnResolve,
    /// Keep routing later replies to the same HR
    Keep,
}

/// Routing behaviour knobs, independent of the transport
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Language for texts whose recipient language is unknown
    pub default_language: String,
    pub resolution: ResolutionPolicy,
    /// Reject date replies that do not look like `DD.MM.YYYY HH:MM`
    pub strict_date_replies: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            resolution: ResolutionPolicy::RemoveOnResolve,
            strict_date_replies: false,
        }
    }
}

/// Full startup configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_bot_token: String,
    pub router: RouterConfig,
}

impl BotConfig {
    /// Load from the process environment.
    ///
    /// A missing token is fatal for startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_bot_token = lookup(TOKEN_VAR)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing(TOKEN_VAR))?;

        let defaults = RouterConfig::default();

        let default_language = match lookup(DEFAULT_LANGUAGE_VAR)
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
        {
            Some(value) => parse_language(DEFAULT_LANGUAGE_VAR, &value)?,
            None => defaults.default_language,
        };

        let resolution = match lookup(REMOVE_ON_RESOLVE_VAR) {
            Some(value) => {
                if parse_flag(REMOVE_ON_RESOLVE_VAR, &value)? {
                    ResolutionPolicy::RemoveOnResolve
                } else {
                    ResolutionPolicy::Keep
                }
            }
            None => defaults.resolution,
        };

        let strict_date_replies = match lookup(STRICT_DATE_REPLIES_VAR) {
            Some(value) => parse_flag(STRICT_DATE_REPLIES_VAR, &value)?,
            None => defaults.strict_date_replies,
        };

        Ok(Self {
            telegram_bot_token,
            router: RouterConfig {
                default_language,
                resolution,
                strict_date_replies,
            },
        })
    }
}

/// Primary subtag of a language code, which must have a translation
fn parse_language(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let primary = value
        .split(['-', '_'])
        .next()
        .unwrap_or(value)
        .to_lowercase();

    if SUPPORTED_LANGUAGES.contains(&primary.as_str()) {
        Ok(primary)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_token_is_fatal() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(TOKEN_VAR))));
        assert!(matches!(
            load(&[(TOKEN_VAR, "   ")]),
            Err(ConfigError::Missing(TOKEN_VAR))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[(TOKEN_VAR, "123:abc")]).unwrap();
        assert_eq!(config.telegram_bot_token, "123:abc");
        assert_eq!(config.router.default_language, "en");
        assert_eq!(config.router.resolution, ResolutionPolicy::RemoveOnResolve);
        assert!(!config.router.strict_date_replies);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (TOKEN_VAR, "123:abc"),
            (DEFAULT_LANGUAGE_VAR, "RU"),
            (REMOVE_ON_RESOLVE_VAR, "false"),
            (STRICT_DATE_REPLIES_VAR, "1"),
        ])
        .unwrap();
        assert_eq!(config.router.default_language, "ru");
        assert_eq!(config.router.resolution, ResolutionPolicy::Keep);
        assert!(config.router.strict_date_replies);
    }

    #[test]
    fn test_default_language_must_have_translation() {
        let config = load(&[(TOKEN_VAR, "123:abc"), (DEFAULT_LANGUAGE_VAR, "ru-RU")]).unwrap();
        assert_eq!(config.router.default_language, "ru");

        let err = load(&[(TOKEN_VAR, "123:abc"), (DEFAULT_LANGUAGE_VAR, "fr")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: DEFAULT_LANGUAGE_VAR,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_flag() {
        let err = load(&[(TOKEN_VAR, "123:abc"), (STRICT_DATE_REPLIES_VAR, "maybe")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: STRICT_DATE_REPLIES_VAR,
                ..
            }
        ));
    }
}
