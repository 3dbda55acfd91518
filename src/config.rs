use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub prices: PricesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricesConfig {
    pub base_url: String,
    pub http_timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    /// ESIOS access token; also picked up from ESIOS_API_KEY / ESIOS_TOKEN.
    pub api_key: Option<String>,
    /// Below this €/kWh the feed average is assumed wholesale-only.
    pub wholesale_floor_eur_kwh: f64,
    /// Multiplier from wholesale-only to all-in residential price.
    pub wholesale_uplift: f64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("LLUM__").split("__"));
        let mut cfg: Config = figment.extract()?;
        if cfg.prices.api_key.is_none() {
            cfg.prices.api_key = std::env::var("ESIOS_API_KEY")
                .or_else(|_| std::env::var("ESIOS_TOKEN"))
                .ok();
        }
        Ok(cfg)
    }
}
