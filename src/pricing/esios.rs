//! Client for the Red Eléctrica ESIOS indicator API.
//!
//! Indicator 1001 is the PVPC 2.0TD reference price, published hourly
//! (quarter-hourly since October 2025), denominated in €/MWh and tagged
//! with a geo_id per price zone. Real-time access needs a token requested
//! from consultasios@ree.es, passed via the `x-api-key` header.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;

use super::{PriceFeed, PriceSample};

/// PVPC 2.0TD reference price indicator.
pub const PVPC_INDICATOR: u32 = 1001;

pub struct EsiosFeed {
    base_url: String,
    client: reqwest::Client,
    api_key: Option<String>,
}

impl EsiosFeed {
    pub fn new(base_url: String, timeout: Duration, api_key: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("llum-engine/0.3"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json; application/vnd.esios-api-v1+json"),
        );
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url,
            client,
            api_key,
        })
    }

    fn url_for(&self, start: NaiveDateTime, end: NaiveDateTime) -> String {
        format!(
            "{}/indicators/{}?start_date={}&end_date={}",
            self.base_url.trim_end_matches('/'),
            PVPC_INDICATOR,
            start.format("%Y-%m-%dT%H:%M"),
            end.format("%Y-%m-%dT%H:%M"),
        )
    }
}

#[async_trait]
impl PriceFeed for EsiosFeed {
    async fn fetch(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<PriceSample>> {
        let mut request = self.client.get(self.url_for(start, end));
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let resp = request.send().await.context("ESIOS GET failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("ESIOS API error: HTTP {status}");
        }

        let body: EsiosResponse = resp.json().await.context("ESIOS JSON parse failed")?;
        let values = body
            .indicator
            .and_then(|i| i.values)
            .or(body.values)
            .unwrap_or_default();

        Ok(values
            .into_iter()
            .filter_map(|v| {
                v.geo_id.map(|geo_id| PriceSample {
                    geo_id,
                    value: v.value,
                })
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct EsiosResponse {
    indicator: Option<EsiosIndicator>,
    /// Some deployments return the values list at the top level.
    values: Option<Vec<EsiosValue>>,
}

#[derive(Debug, Deserialize)]
struct EsiosIndicator {
    values: Option<Vec<EsiosValue>>,
}

#[derive(Debug, Deserialize)]
struct EsiosValue {
    geo_id: Option<u32>,
    value: Option<f64>,
}
