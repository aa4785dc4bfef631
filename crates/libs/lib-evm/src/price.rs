//! # CoinGecko Spot Price
//!
//! USD spot price for the underlying asset. On the local test network the
//! price is pinned to 1.0 and no request is made.

use crate::error::EvmError;
use lib_core::NetworkKind;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";
const LOCAL_SPOT_PRICE: f64 = 1.0;

#[derive(serde::Deserialize)]
struct CoinPrice {
    usd: Option<f64>,
}

/// `simple/price` body: `{"<id>": {"usd": 1.23}}`.
type SimplePriceResponse = HashMap<String, CoinPrice>;

/// HTTP client for the CoinGecko `simple/price` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: Client,
    api_base: String,
    network: NetworkKind,
}

impl CoinGeckoClient {
    /// Create a new HTTP client with timeout configuration
    pub fn new(network: NetworkKind) -> Result<Self, EvmError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            api_base: COINGECKO_API_BASE.to_string(),
            network,
        })
    }

    /// Point the client at another API base (no trailing slash).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Current USD price of `coin_id`.
    pub async fn get_price(&self, coin_id: &str) -> Result<f64, EvmError> {
        if self.network.is_local() {
            return Ok(LOCAL_SPOT_PRICE);
        }

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.api_base, coin_id
        );
        debug!(coin_id, "Fetching CoinGecko price");

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(coin_id, error = %e, "CoinGecko request failed");
            EvmError::Price("Failed to fetch price".to_string())
        })?;

        if !response.status().is_success() {
            warn!(coin_id, status = %response.status(), "CoinGecko returned an error status");
            return Err(EvmError::Price("Failed to fetch price".to_string()));
        }

        let body: SimplePriceResponse = response.json().await.map_err(|e| {
            warn!(coin_id, error = %e, "CoinGecko parse failed");
            EvmError::Price("Price unavailable".to_string())
        })?;

        extract_price(&body, coin_id)
    }
}

fn extract_price(body: &SimplePriceResponse, coin_id: &str) -> Result<f64, EvmError> {
    body.get(coin_id)
        .and_then(|p| p.usd)
        .filter(|price| *price > 0.0 && price.is_finite())
        .ok_or_else(|| EvmError::Price("Price unavailable".to_string()))
}
