use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use crate::api::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

/// Miro MCP - read and edit Miro boards from an MCP client over stdio
#[derive(Parser, Debug)]
#[command(name = "miro-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Miro OAuth access token
    #[arg(short, long, env = "MIRO_OAUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Miro REST API root
    #[arg(long, env = "MIRO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Items requested per listing page (10 to 50)
    #[arg(
        long,
        env = "MIRO_PAGE_SIZE",
        default_value_t = MAX_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(MIN_PAGE_SIZE as i64..=MAX_PAGE_SIZE as i64)
    )]
    pub page_size: u32,

    /// Timeout for a single HTTP call, in seconds
    #[arg(long, env = "MIRO_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Timeout for building one spatial map, in seconds
    #[arg(long, env = "MIRO_MAP_TIMEOUT_SECS", default_value_t = 120)]
    pub map_timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Client settings, failing when no usable token was given.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let token = match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => bail!(
                "No Miro access token. Pass --token or set MIRO_OAUTH_TOKEN \
                 (create one at https://developers.miro.com/docs/rest-api-build-your-first-hello-world-app)"
            ),
        };
        Ok(ClientConfig {
            api_url: self.api_url.clone(),
            token,
            timeout_secs: self.request_timeout_secs,
        })
    }

    pub fn map_timeout(&self) -> Duration {
        Duration::from_secs(self.map_timeout_secs)
    }
}
