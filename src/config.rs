use std::net::{IpAddr, SocketAddr};

use anyhow::Context;

use crate::models::ProviderKind;
use crate::services::news_filter::RelevancePolicy;
use crate::services::news_service::NewsConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub provider: ProviderKind,
    pub include_profile: bool,
    pub news: NewsConfig,
}

fn flag(value: Option<String>, default: bool) -> bool {
    value
        .and_then(|s| s.trim().to_lowercase().parse::<bool>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("HOST must be an IP address")?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let provider = lookup("MARKET_DATA_PROVIDER")
            .unwrap_or_else(|| "alphavantage".to_string())
            .parse::<ProviderKind>()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            host,
            port,
            provider,
            include_profile: flag(lookup("PROFILE_ENABLED"), true),
            news: NewsConfig {
                filter_enabled: flag(lookup("NEWS_FILTER_ENABLED"), true),
                policy: RelevancePolicy {
                    loose_summary_match: flag(lookup("NEWS_LOOSE_MATCH"), true),
                },
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
