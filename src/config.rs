use crate::constants::{DEFAULT_AVATAR, DEFAULT_USERNAME, DEFAULT_WEBHOOK_URL, SONGLINK_API_BASE};

/// Which platform fills the last slot of the share card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FourthPlatform {
    GooglePlayMusic,
    Soundcloud,
}

impl FourthPlatform {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("google") => FourthPlatform::GooglePlayMusic,
            Some("soundcloud") | None => FourthPlatform::Soundcloud,
            Some(other) => {
                tracing::warn!(
                    "unknown fourth platform {other:?}. falling back to soundcloud."
                );
                FourthPlatform::Soundcloud
            }
        }
    }
}

/// Everything the service reads from the environment, resolved once at
/// startup and passed down explicitly.
#[derive(Clone, Debug)]
pub struct Config {
    pub songlink_api_base: String,
    pub webhook_url: String,
    pub username: String,
    pub avatar_url: String,
    pub fourth_platform: FourthPlatform,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let webhook_url = std::env::var("WEBHOOK_URL").unwrap_or_else(|_| {
            tracing::warn!(
                "no webhook url found. shares will not be delivered until WEBHOOK_URL is set."
            );
            DEFAULT_WEBHOOK_URL.to_string()
        });

        Config {
            songlink_api_base: std::env::var("SONGLINK_URL")
                .unwrap_or_else(|_| SONGLINK_API_BASE.to_string()),
            webhook_url,
            username: std::env::var("SHARE_USERNAME")
                .unwrap_or_else(|_| DEFAULT_USERNAME.to_string()),
            avatar_url: std::env::var("SHARE_AVATAR")
                .unwrap_or_else(|_| DEFAULT_AVATAR.to_string()),
            fourth_platform: FourthPlatform::from_env_value(
                std::env::var("FOURTH_PLATFORM").ok().as_deref(),
            ),
            port: std::env::var("PORT")
                .ok()
                .and_then(|port| port.parse::<u16>().ok())
                .unwrap_or(8080),
        }
    }
}
