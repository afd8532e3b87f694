//! exchangerate-api.com integration (v6 "latest" endpoint).

use std::collections::HashMap;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::RateSource;
use crate::error::AppError;

pub const API_URL: &str = "https://v6.exchangerate-api.com";
pub const API_KEY_ENV: &str = "EXCHANGERATE_API_KEY";

/// Conversion rates relative to one base currency.
///
/// `rates[X]` is the amount of X worth one unit of base, so converting an
/// amount in X to base divides by `rates[X]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Build a table; the base currency always maps to 1 when absent.
    pub fn new(base: impl Into<String>, mut rates: HashMap<String, f64>) -> Self {
        let base = base.into().to_ascii_uppercase();
        rates.entry(base.clone()).or_insert(1.0);
        Self { base, rates }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(&currency.to_ascii_uppercase()).copied()
    }

    /// Convert `amount` quoted in `currency` into the base currency.
    pub fn to_base(&self, amount: f64, currency: &str) -> Result<f64, AppError> {
        let rate = self.rate(currency).ok_or_else(|| {
            AppError::upstream(format!("No {} conversion rate for {currency}.", self.base))
        })?;
        if !(rate.is_finite() && rate > 0.0) {
            return Err(AppError::upstream(format!(
                "Invalid {} conversion rate for {currency}: {rate}.",
                self.base
            )));
        }
        Ok(amount / rate)
    }
}

pub struct ExchangeRateClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl ExchangeRateClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(API_URL, api_key)
    }

    pub fn with_url(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn latest(&self, base: &str) -> Result<RateTable, AppError> {
        let base = base.to_ascii_uppercase();
        let url = format!("{}/v6/{}/latest/{base}", self.api_url, self.api_key);

        tracing::debug!(base = %base, "loading conversion rates");

        // Strip the URL from transport errors: it carries the API key.
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::upstream(format!("Exchange rate request failed: {}", e.without_url())))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| AppError::upstream(format!("Failed to read exchange rate response: {}", e.without_url())))?;

        let body: LatestResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(AppError::upstream(format!(
                    "Exchange rate request failed with status {status}."
                )));
            }
            Err(e) => {
                return Err(AppError::upstream(format!("Failed to parse exchange rate response: {e}")));
            }
        };

        if body.result.as_deref() == Some("error") {
            let kind = body.error_type.as_deref().unwrap_or("unknown");
            return Err(AppError::upstream(format!("Exchange rate API error: {kind}.")));
        }
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "Exchange rate request failed with status {status}."
            )));
        }

        let rates = body
            .conversion_rates
            .ok_or_else(|| AppError::upstream("Exchange rate response has no conversion_rates."))?;

        let table = RateTable::new(base, rates);
        tracing::info!(base = table.base(), rates = table.len(), "loaded conversion rates");
        Ok(table)
    }
}

impl RateSource for ExchangeRateClient {
    fn latest(&self, base: &str) -> Result<RateTable, AppError> {
        ExchangeRateClient::latest(self, base)
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: Option<HashMap<String, f64>>,
}
