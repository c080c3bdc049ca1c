//! Bot configuration.
//!
//! All settings come from the environment (optionally seeded from a `.env`
//! file by the binary) and are validated once at startup. A missing bot
//! token or store URI is fatal.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN` (or `API_TOKEN`): bot credential
//! - `MONGO_URI`: document store connection string
//!
//! Optional:
//! - `MONGO_DATABASE`: database name (default: `data`)
//! - `MONGO_COLLECTION`: collection name (default: `invoices`)
//! - `PRIVILEGED_USER_IDS`: comma-separated user ids allowed to run reports
//!   and to use the bot in private chats
//! - `ALLOWED_CHAT_ID`: the one group chat the bot serves (default: any)
//! - `REPORT_TIMEZONE`: IANA timezone for day boundaries (default: `Europe/Kyiv`)
//! - `RESOLVE_MARKERS`: comma-separated reply tokens that resolve an invoice
//!   (default: `++`)
//! - `DAILY_DIGEST`: send the closed day's report to privileged users at
//!   midnight (default: `false`)

use chrono_tz::Tz;
use thiserror::Error;

use crate::clock::DEFAULT_TIMEZONE;

pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
/// Older deployments used this name for the token.
pub const LEGACY_BOT_TOKEN_ENV: &str = "API_TOKEN";
pub const MONGO_URI_ENV: &str = "MONGO_URI";
pub const MONGO_DATABASE_ENV: &str = "MONGO_DATABASE";
pub const MONGO_COLLECTION_ENV: &str = "MONGO_COLLECTION";
pub const PRIVILEGED_USERS_ENV: &str = "PRIVILEGED_USER_IDS";
pub const ALLOWED_CHAT_ENV: &str = "ALLOWED_CHAT_ID";
pub const TIMEZONE_ENV: &str = "REPORT_TIMEZONE";
pub const RESOLVE_MARKERS_ENV: &str = "RESOLVE_MARKERS";
pub const DAILY_DIGEST_ENV: &str = "DAILY_DIGEST";

/// Reply texts that resolve an invoice when no override is configured.
pub const DEFAULT_RESOLVE_MARKERS: [&str; 2] = ["++", "отмена"];

const DEFAULT_DATABASE: &str = "data";
const DEFAULT_COLLECTION: &str = "invoices";

/// Configuration errors. All of them stop the process before it connects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub mongo_collection: String,
    /// Allow-list for reports and private chats.
    pub privileged_users: Vec<i64>,
    /// Group chat the bot serves; `None` accepts any group.
    pub allowed_chat_id: Option<i64>,
    pub timezone: Tz,
    pub resolve_markers: Vec<String>,
    pub daily_digest: bool,
}

impl BotConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get(BOT_TOKEN_ENV)
            .or_else(|| get(LEGACY_BOT_TOKEN_ENV))
            .ok_or(ConfigError::Missing(BOT_TOKEN_ENV))?;
        let mongo_uri = get(MONGO_URI_ENV).ok_or(ConfigError::Missing(MONGO_URI_ENV))?;

        let privileged_users = match get(PRIVILEGED_USERS_ENV) {
            Some(raw) => parse_id_list(PRIVILEGED_USERS_ENV, &raw)?,
            None => Vec::new(),
        };

        let allowed_chat_id = get(ALLOWED_CHAT_ENV)
            .map(|raw| parse_id(ALLOWED_CHAT_ENV, &raw))
            .transpose()?;

        let timezone = match get(TIMEZONE_ENV) {
            Some(raw) => raw.parse::<Tz>().map_err(|_| ConfigError::Invalid {
                name: TIMEZONE_ENV,
                value: raw.clone(),
            })?,
            None => DEFAULT_TIMEZONE,
        };

        let resolve_markers = match get(RESOLVE_MARKERS_ENV) {
            Some(raw) => {
                let markers: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .collect();
                if markers.is_empty() {
                    return Err(ConfigError::Invalid {
                        name: RESOLVE_MARKERS_ENV,
                        value: raw,
                    });
                }
                markers
            }
            None => DEFAULT_RESOLVE_MARKERS.iter().map(|m| m.to_string()).collect(),
        };

        let daily_digest = match get(DAILY_DIGEST_ENV) {
            Some(raw) => parse_bool(DAILY_DIGEST_ENV, &raw)?,
            None => false,
        };

        Ok(Self {
            bot_token,
            mongo_uri,
            mongo_database: get(MONGO_DATABASE_ENV).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            mongo_collection: get(MONGO_COLLECTION_ENV)
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            privileged_users,
            allowed_chat_id,
            timezone,
            resolve_markers,
            daily_digest,
        })
    }
}

fn parse_id(name: &'static str, raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

fn parse_id_list(name: &'static str, raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_id(name, part))
        .collect()
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![(BOT_TOKEN_ENV, "123:abc"), (MONGO_URI_ENV, "mongodb://localhost")]
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::from_lookup(lookup(&required())).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.mongo_database, "data");
        assert_eq!(config.mongo_collection, "invoices");
        assert!(config.privileged_users.is_empty());
        assert_eq!(config.allowed_chat_id, None);
        assert_eq!(config.timezone, chrono_tz::Europe::Kyiv);
        assert_eq!(
            config.resolve_markers,
            vec!["++".to_string(), "отмена".to_string()]
        );
        assert!(!config.daily_digest);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = BotConfig::from_lookup(lookup(&[(MONGO_URI_ENV, "mongodb://x")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(BOT_TOKEN_ENV));
    }

    #[test]
    fn test_missing_store_uri_is_fatal() {
        let err = BotConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t"), (MONGO_URI_ENV, "  ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(MONGO_URI_ENV));
    }

    #[test]
    fn test_legacy_token_name() {
        let config = BotConfig::from_lookup(lookup(&[
            (LEGACY_BOT_TOKEN_ENV, "legacy"),
            (MONGO_URI_ENV, "mongodb://x"),
        ]))
        .unwrap();
        assert_eq!(config.bot_token, "legacy");
    }

    #[test]
    fn test_full_settings() {
        let mut vars = required();
        vars.extend([
            (PRIVILEGED_USERS_ENV, "7080662182, 6439176819"),
            (ALLOWED_CHAT_ENV, "-1001509336046"),
            (TIMEZONE_ENV, "Europe/Warsaw"),
            (RESOLVE_MARKERS_ENV, "++, done"),
            (DAILY_DIGEST_ENV, "yes"),
        ]);
        let config = BotConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.privileged_users, vec![7080662182, 6439176819]);
        assert_eq!(config.allowed_chat_id, Some(-1001509336046));
        assert_eq!(config.timezone, chrono_tz::Europe::Warsaw);
        assert_eq!(config.resolve_markers, vec!["++".to_string(), "done".to_string()]);
        assert!(config.daily_digest);
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = required();
        vars.push((PRIVILEGED_USERS_ENV, "12,abc"));
        assert!(matches!(
            BotConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { name: PRIVILEGED_USERS_ENV, .. })
        ));

        let mut vars = required();
        vars.push((TIMEZONE_ENV, "Mars/Olympus"));
        assert!(matches!(
            BotConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { name: TIMEZONE_ENV, .. })
        ));

        let mut vars = required();
        vars.push((RESOLVE_MARKERS_ENV, " , "));
        assert!(matches!(
            BotConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { name: RESOLVE_MARKERS_ENV, .. })
        ));
    }
}
