//! Daily price fetching from a CoinGecko-style `market_chart` endpoint
//!
//! One blocking GET per call, no retry and no caching. The endpoint
//! template and transport timeout are construction-time configuration.

// External crates
use log::{debug, info};
use polars::prelude::DataFrame;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Internal modules
use crate::constants::{
    ASSET_ID_PLACEHOLDER, DEFAULT_DAYS, DEFAULT_ENDPOINT_TEMPLATE, DEFAULT_VS_CURRENCY,
};
use crate::error::{ProviderError, Result};
use crate::util::pre_processor::build_price_frame;

/// Fetcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// URL template containing `{asset_id}`
    pub endpoint_template: String,
    /// Transport timeout; `None` blocks until the provider answers
    pub timeout: Option<Duration>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoint_template: DEFAULT_ENDPOINT_TEMPLATE.to_string(),
            timeout: None,
        }
    }
}

impl FetcherConfig {
    pub fn with_endpoint(mut self, endpoint_template: &str) -> Self {
        self.endpoint_template = endpoint_template.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What to fetch: asset, quote currency and history length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub asset_id: String,
    pub vs_currency: String,
    /// Number of days of history, or `"max"`
    pub days: String,
}

impl FetchRequest {
    pub fn new(asset_id: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            days: DEFAULT_DAYS.to_string(),
        }
    }

    pub fn vs_currency(mut self, vs_currency: &str) -> Self {
        self.vs_currency = vs_currency.to_string();
        self
    }

    pub fn days(mut self, days: &str) -> Self {
        self.days = days.to_string();
        self
    }
}

/// A single `[epoch_ms, price]` observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

/// Provider response body; only `prices` is used
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

/// Blocking client for the price provider
#[derive(Debug, Clone)]
pub struct PriceFetcher {
    client: Client,
    config: FetcherConfig,
}

impl PriceFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::from)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Endpoint for one asset, with the template placeholder substituted
    pub fn endpoint_for(&self, asset_id: &str) -> String {
        self.config
            .endpoint_template
            .replace(ASSET_ID_PLACEHOLDER, asset_id)
    }

    /// Fetch the price series for `request` as a price frame
    ///
    /// # Returns
    ///
    /// A DataFrame with `Date`, `Open`, `High`, `Low`, `Close`, sorted by date
    pub fn fetch_price_series(&self, request: &FetchRequest) -> Result<DataFrame> {
        let url = self.endpoint_for(&request.asset_id);
        info!(
            "Fetching {} prices in {} (days={}) from {}",
            request.asset_id, request.vs_currency, request.days, url
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", request.vs_currency.as_str()),
                ("days", request.days.as_str()),
            ])
            .send()
            .map_err(ProviderError::from)?;

        let status = response.status();
        let body = response.text().map_err(ProviderError::from)?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let points = parse_market_chart(&body)?;
        if points.is_empty() {
            return Err(ProviderError::NoData(request.asset_id.clone()).into());
        }
        debug!("Provider returned {} observations", points.len());

        build_price_frame(&points)
    }
}

/// Parse a provider body into observations
///
/// Any body without a `prices` array of `[timestamp, price]` pairs is a
/// provider error. Timestamps must be whole milliseconds.
pub fn parse_market_chart(body: &str) -> std::result::Result<Vec<PricePoint>, ProviderError> {
    let chart: MarketChart = serde_json::from_str(body)?;

    chart
        .prices
        .into_iter()
        .map(|(timestamp, price)| {
            if !timestamp.is_finite() || timestamp.fract() != 0.0 {
                return Err(ProviderError::Contract(format!(
                    "timestamp {} is not an epoch millisecond",
                    timestamp
                )));
            }
            Ok(PricePoint {
                timestamp_ms: timestamp as i64,
                price,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_market_chart() {
        let body = r#"{
            "prices": [[1367107200000, 135.3], [1367193600000, 141.96]],
            "market_caps": [[1367107200000, 1500517590.0]],
            "total_volumes": [[1367107200000, 0.0]]
        }"#;
        let points = parse_market_chart(body).unwrap();
        assert_eq!(
            points,
            vec![
                PricePoint {
                    timestamp_ms: 1_367_107_200_000,
                    price: 135.3
                },
                PricePoint {
                    timestamp_ms: 1_367_193_600_000,
                    price: 141.96
                },
            ]
        );
    }

    #[test]
    fn test_parse_market_chart_rejects_other_shapes() {
        assert!(matches!(
            parse_market_chart(r#"{"error": "coin not found"}"#),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(
            parse_market_chart(r#"{"prices": [[1, 2, 3]]}"#),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(
            parse_market_chart("not json"),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(
            parse_market_chart(r#"{"prices": [[1.5, 2.0]]}"#),
            Err(ProviderError::Contract(_))
        ));
    }

    #[test]
    fn test_endpoint_substitution() {
        let fetcher = PriceFetcher::new(
            FetcherConfig::default().with_endpoint("http://localhost/coins/{asset_id}/chart"),
        )
        .unwrap();
        assert_eq!(
            fetcher.endpoint_for("ethereum"),
            "http://localhost/coins/ethereum/chart"
        );
    }

    #[test]
    fn test_fetch_request_defaults() {
        let request = FetchRequest::new("bitcoin");
        assert_eq!(request.vs_currency, "usd");
        assert_eq!(request.days, "max");

        let request = request.vs_currency("eur").days("30");
        assert_eq!(request.vs_currency, "eur");
        assert_eq!(request.days, "30");
    }
}
