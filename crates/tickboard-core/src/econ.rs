//! Macro-economic data boundary.
//!
//! [`EconData`] is the contract for annual indicator series keyed by
//! country; [`WorldBankClient`] is the production adapter against the
//! World Bank open API. The API returns a two-element heterogeneous JSON
//! array (paging metadata followed by the entry list), so the parser reads
//! the top level as loose values before drilling into typed entries.

use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{DataUnavailable, FetchFuture};
use crate::ValidationError;

/// Country with a World Bank ISO-3166 alpha-3 code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    name: String,
    code: String,
}

impl Country {
    pub fn new(name: impl Into<String>, code: &str) -> Result<Self, ValidationError> {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCountryCode {
                value: code.clone(),
            });
        }

        Ok(Self {
            name: name.into(),
            code,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Built-in country catalog offered by the dashboard GDP section.
pub fn country_catalog() -> Vec<Country> {
    [
        ("United States", "USA"),
        ("China", "CHN"),
        ("Japan", "JPN"),
        ("Germany", "DEU"),
        ("France", "FRA"),
        ("United Kingdom", "GBR"),
        ("Brazil", "BRA"),
        ("Mexico", "MEX"),
        ("India", "IND"),
    ]
    .into_iter()
    .filter_map(|(name, code)| Country::new(name, code).ok())
    .collect()
}

/// Single observation of an annual indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualPoint {
    pub year: i32,
    pub value: f64,
}

/// Annual indicator series in ascending year order, null years dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSeries {
    pub country: Country,
    points: Vec<AnnualPoint>,
}

impl AnnualSeries {
    pub fn new(country: Country, mut points: Vec<AnnualPoint>) -> Self {
        points.sort_by_key(|point| point.year);
        points.dedup_by_key(|point| point.year);
        Self { country, points }
    }

    pub fn points(&self) -> &[AnnualPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&AnnualPoint> {
        self.points.last()
    }
}

/// Macro data contract the dashboard depends on.
pub trait EconData: Send + Sync {
    /// Annual GDP (current US$) series for one country.
    fn gdp_series<'a>(&'a self, country: &'a Country) -> FetchFuture<'a, AnnualSeries>;
}

/// World Bank endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldBankConfig {
    pub base_url: String,
    pub indicator: String,
    pub from_year: i32,
    pub to_year: i32,
    pub timeout_ms: u64,
}

impl Default for WorldBankConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.worldbank.org/v2"),
            indicator: String::from("NY.GDP.MKTP.CD"),
            from_year: 1960,
            to_year: 2022,
            timeout_ms: crate::http_client::DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Production macro data adapter.
#[derive(Clone)]
pub struct WorldBankClient {
    http: Arc<dyn HttpClient>,
    config: WorldBankConfig,
}

impl WorldBankClient {
    pub fn new(http: Arc<dyn HttpClient>, config: WorldBankConfig) -> Self {
        Self { http, config }
    }

    async fn fetch_gdp(&self, country: &Country) -> Result<AnnualSeries, DataUnavailable> {
        let url = format!(
            "{}/country/{}/indicator/{}?format=json&per_page=200&date={}:{}",
            self.config.base_url,
            country.code().to_ascii_lowercase(),
            self.config.indicator,
            self.config.from_year,
            self.config.to_year
        );
        debug!("fetching {url}");

        let request = HttpRequest::get(url).with_timeout_ms(self.config.timeout_ms);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| DataUnavailable::transport(country.code(), e.message()))?;

        if !response.is_success() {
            return Err(DataUnavailable::transport(
                country.code(),
                format!("world bank returned status {}", response.status),
            ));
        }

        let series = parse_world_bank_body(country.clone(), &response.body)?;
        if series.is_empty() {
            return Err(DataUnavailable::unknown_symbol(
                country.code(),
                "world bank has no observations for this country",
            ));
        }

        Ok(series)
    }
}

impl EconData for WorldBankClient {
    fn gdp_series<'a>(&'a self, country: &'a Country) -> FetchFuture<'a, AnnualSeries> {
        Box::pin(async move { self.fetch_gdp(country).await })
    }
}

#[derive(Debug, Deserialize)]
struct WorldBankEntry {
    date: String,
    value: Option<f64>,
}

fn parse_world_bank_body(
    country: Country,
    body: &str,
) -> Result<AnnualSeries, DataUnavailable> {
    let envelope: Vec<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| DataUnavailable::parse(country.code().to_owned(), e.to_string()))?;

    // Element zero is paging metadata; element one is the entry list, or
    // absent when the country code is unknown.
    let Some(entries_value) = envelope.into_iter().nth(1) else {
        return Ok(AnnualSeries::new(country, Vec::new()));
    };

    let entries: Vec<WorldBankEntry> = serde_json::from_value(entries_value)
        .map_err(|e| DataUnavailable::parse(country.code().to_owned(), e.to_string()))?;

    let points = entries
        .into_iter()
        .filter_map(|entry| {
            let year = entry.date.parse::<i32>().ok()?;
            let value = entry.value.filter(|v| v.is_finite())?;
            Some(AnnualPoint { year, value })
        })
        .collect();

    Ok(AnnualSeries::new(country, points))
}
