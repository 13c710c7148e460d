use std::{path::Path, time::Duration};

use ::config::{File, FileFormat};
use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::extract::UNWRAPPED_WIDTH;

/// emailSanta.com's reply generator.
pub const DEFAULT_ENDPOINT: &str = "https://www.emailsanta.com/letsanta_reg.asp";

pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Layers the given TOML files over the defaults, later files win. Every file
/// must exist.
pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<FetcherConfig> {
    let mut builder = ::config::Config::builder();
    for path in paths {
        builder = builder.add_source(
            File::from(path.as_ref())
                .format(FileFormat::Toml)
                .required(true),
        );
    }
    builder
        .build()
        .context("Failed to read config files")?
        .try_deserialize()
        .context("Failed to parse config")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub endpoint: Url,
    /// Unset means a request may block for as long as the server takes.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    pub wrap_width: usize,
}

impl FetcherConfig {
    pub fn new(endpoint_override: Option<Url>) -> Self {
        Self {
            endpoint: endpoint_override.unwrap_or_else(|| DEFAULT_ENDPOINT.parse().unwrap()),
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.into(),
            wrap_width: UNWRAPPED_WIDTH,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::new(None)
    }
}
