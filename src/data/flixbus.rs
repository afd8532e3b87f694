//! FlixBus trip search integration.

use std::fmt;

use chrono::{Local, NaiveDate};
use reqwest::blocking::Client;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::data::TripSource;
use crate::domain::TripQuery;
use crate::error::AppError;

pub const SEARCH_URL: &str = "https://global.api.flixbus.com/search/service/v4/search";

/// Parsed body of one trip search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripSearch {
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub global_platform_fees: Vec<PlatformFee>,
}

impl TripSearch {
    /// Original prices of every trip result, in upstream order.
    pub fn original_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.trips
            .iter()
            .flat_map(|trip| trip.results.iter().map(|(_, result)| result.price.original))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    /// Results keyed by the API's internal uid, kept in response order.
    #[serde(deserialize_with = "ordered_results")]
    pub results: Vec<(String, TripResult)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripResult {
    pub price: Price,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    /// Price in the requested currency, before platform fees.
    pub original: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformFee {
    #[serde(default)]
    pub fee_amount: Option<FeeAmount>,
    #[serde(default, rename = "abTestFlag")]
    pub ab_test_flag: Option<serde_json::Value>,
}

impl PlatformFee {
    pub fn is_flagged(&self) -> bool {
        self.ab_test_flag.is_some()
    }
}

/// The API sends fee amounts either as JSON numbers or as numeric strings.
///
/// Anything else lands in `Other` and counts as no amount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeeAmount {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FeeAmount {
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            FeeAmount::Number(v) => Some(*v),
            FeeAmount::Text(s) => s.trim().parse::<f64>().ok(),
            FeeAmount::Other(_) => None,
        };
        value.filter(|v| v.is_finite())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn ordered_results<'de, D>(deserializer: D) -> Result<Vec<(String, TripResult)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ResultsVisitor;

    impl<'de> Visitor<'de> for ResultsVisitor {
        type Value = Vec<(String, TripResult)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of trip results")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, TripResult>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(ResultsVisitor)
}

/// Blocking client for the v4 search endpoint.
///
/// The departure date is resolved once at construction so every currency
/// queries the same day, even if the run crosses midnight.
pub struct FlixbusClient {
    client: Client,
    search_url: String,
    query: TripQuery,
    departure_date: NaiveDate,
}

impl FlixbusClient {
    pub fn new(query: TripQuery) -> Result<Self, AppError> {
        Self::with_url(SEARCH_URL, query)
    }

    pub fn with_url(search_url: impl Into<String>, query: TripQuery) -> Result<Self, AppError> {
        let departure_date = query
            .departure
            .resolve(Local::now().date_naive())
            .ok_or_else(|| AppError::config("Departure date out of range (check --days-ahead)."))?;
        Ok(Self {
            client: Client::new(),
            search_url: search_url.into(),
            query,
            departure_date,
        })
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn search(&self, currency: &str) -> Result<TripSearch, AppError> {
        let departure = self.departure_date.format("%d.%m.%Y").to_string();
        let products = self.query.products();

        tracing::debug!(currency, departure = %departure, "searching trips");

        let resp = self
            .client
            .get(&self.search_url)
            .query(&[
                ("from_city_id", self.query.from_city_id.as_str()),
                ("to_city_id", self.query.to_city_id.as_str()),
                ("departure_date", departure.as_str()),
                ("products", products.as_str()),
                ("currency", currency),
                ("locale", self.query.locale.as_str()),
                ("search_by", "cities"),
                ("include_after_midnight_rides", "1"),
            ])
            .send()
            .map_err(|e| AppError::upstream(format!("Trip search for {currency} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::upstream(format!(
                "Trip search for {currency} failed with status {}.",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| AppError::upstream(format!("Failed to parse trip search for {currency}: {e}")))
    }
}

impl TripSource for FlixbusClient {
    fn search(&self, currency: &str) -> Result<TripSearch, AppError> {
        FlixbusClient::search(self, currency)
    }
}
