//! Market data provider boundary.
//!
//! [`MarketData`] is the contract the dashboard orchestrator depends on;
//! [`YahooClient`] is the production adapter that speaks the provider's
//! unofficial chart and quote-summary endpoints through the [`HttpClient`]
//! seam. All failures surface as [`DataUnavailable`] carrying the affected
//! subject and a cause, so callers can degrade one section without aborting
//! the render.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::{
    CompanySnapshot, DateRange, Interval, LatestQuote, OhlcBar, OhlcSeries, Symbol, UtcDateTime,
};

/// Classification of a provider fetch failure.
///
/// Distinguishes "symbol doesn't exist" from "network timed out" from
/// "rate limited" so the caller can present each differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    UnknownSymbol,
    EmptySeries,
    Transport,
    RateLimited,
    Parse,
}

/// Provider returned nothing usable for a requested subject.
///
/// Localized to the affected dashboard section; never fatal to a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUnavailable {
    subject: String,
    kind: FetchErrorKind,
    cause: String,
}

impl DataUnavailable {
    pub fn unknown_symbol(subject: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: FetchErrorKind::UnknownSymbol,
            cause: cause.into(),
        }
    }

    pub fn empty_series(subject: impl Into<String>, range: DateRange) -> Self {
        Self {
            subject: subject.into(),
            kind: FetchErrorKind::EmptySeries,
            cause: format!("provider returned no bars for {range}"),
        }
    }

    pub fn transport(subject: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: FetchErrorKind::Transport,
            cause: cause.into(),
        }
    }

    pub fn rate_limited(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: FetchErrorKind::RateLimited,
            cause: String::from("provider rate limit hit"),
        }
    }

    pub fn parse(subject: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: FetchErrorKind::Parse,
            cause: cause.into(),
        }
    }

    /// Symbol or country code this failure is scoped to.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }
}

impl Display for DataUnavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "no data available for {}: {}", self.subject, self.cause)
    }
}

impl std::error::Error for DataUnavailable {}

/// Boxed future returned by fetch seams.
pub type FetchFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, DataUnavailable>> + Send + 'a>>;

/// Market data contract the dashboard depends on.
pub trait MarketData: Send + Sync {
    /// Current metadata and price fields for a symbol. Fields the provider
    /// omits stay `None`.
    fn snapshot<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, CompanySnapshot>;

    /// OHLC bars within `[range.start, range.end]` bucketed by `interval`.
    /// Never returns bars outside the range.
    fn history<'a>(
        &'a self,
        symbol: &'a Symbol,
        range: DateRange,
        interval: Interval,
    ) -> FetchFuture<'a, OhlcSeries>;

    /// Single most recent close, for index and currency widgets.
    fn latest_quote<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, LatestQuote>;
}

/// Provider endpoint configuration, passed explicitly at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub chart_base_url: String,
    pub summary_base_url: String,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            chart_base_url: String::from("https://query1.finance.yahoo.com/v8/finance/chart"),
            summary_base_url: String::from(
                "https://query1.finance.yahoo.com/v10/finance/quoteSummary",
            ),
            timeout_ms: crate::http_client::DEFAULT_TIMEOUT_MS,
        }
    }
}

const SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,assetProfile";

/// Production market data adapter.
#[derive(Clone)]
pub struct YahooClient {
    http: Arc<dyn HttpClient>,
    config: ProviderConfig,
}

impl YahooClient {
    pub fn new(http: Arc<dyn HttpClient>, config: ProviderConfig) -> Self {
        Self { http, config }
    }

    async fn fetch_body(&self, subject: &str, url: String) -> Result<String, DataUnavailable> {
        debug!("fetching {url}");
        let request = HttpRequest::get(url)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.config.timeout_ms);

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| DataUnavailable::transport(subject, e.message()))?;

        if response.status == 429 {
            return Err(DataUnavailable::rate_limited(subject));
        }
        if response.status == 404 {
            return Err(DataUnavailable::unknown_symbol(
                subject,
                "provider does not know this symbol",
            ));
        }
        if !response.is_success() {
            return Err(DataUnavailable::transport(
                subject,
                format!("provider returned status {}", response.status),
            ));
        }

        Ok(response.body)
    }

    async fn fetch_chart(
        &self,
        symbol: &Symbol,
        query: String,
    ) -> Result<ChartResult, DataUnavailable> {
        let url = format!(
            "{}/{}?{}",
            self.config.chart_base_url,
            urlencoding::encode(symbol.as_str()),
            query
        );
        let body = self.fetch_body(symbol.as_str(), url).await?;

        let parsed: ChartResponse = serde_json::from_str(&body)
            .map_err(|e| DataUnavailable::parse(symbol.as_str(), e.to_string()))?;

        if let Some(error) = parsed.chart.error {
            return Err(DataUnavailable::unknown_symbol(
                symbol.as_str(),
                error.description,
            ));
        }

        parsed
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                DataUnavailable::unknown_symbol(symbol.as_str(), "empty chart result set")
            })
    }

    async fn fetch_history(
        &self,
        symbol: &Symbol,
        range: DateRange,
        interval: Interval,
    ) -> Result<OhlcSeries, DataUnavailable> {
        let query = format!(
            "period1={}&period2={}&interval={}",
            range.start_unix(),
            range.end_unix_exclusive(),
            interval.as_str()
        );
        let result = self.fetch_chart(symbol, query).await?;
        let bars = result.into_bars(&range);

        if bars.is_empty() {
            return Err(DataUnavailable::empty_series(symbol.as_str(), range));
        }

        Ok(OhlcSeries::new(symbol.clone(), interval, bars))
    }

    async fn fetch_latest_quote(&self, symbol: &Symbol) -> Result<LatestQuote, DataUnavailable> {
        let result = self
            .fetch_chart(symbol, String::from("range=1d&interval=1d"))
            .await?;

        result
            .latest_close()
            .map(|(ts, close)| LatestQuote {
                symbol: symbol.clone(),
                ts,
                close,
            })
            .ok_or_else(|| {
                DataUnavailable::parse(symbol.as_str(), "chart result carries no close values")
            })
    }

    async fn fetch_snapshot(&self, symbol: &Symbol) -> Result<CompanySnapshot, DataUnavailable> {
        let url = format!(
            "{}/{}?modules={}",
            self.config.summary_base_url,
            urlencoding::encode(symbol.as_str()),
            SUMMARY_MODULES
        );
        let body = self.fetch_body(symbol.as_str(), url).await?;

        let parsed: SummaryResponse = serde_json::from_str(&body)
            .map_err(|e| DataUnavailable::parse(symbol.as_str(), e.to_string()))?;

        if let Some(error) = parsed.quote_summary.error {
            return Err(DataUnavailable::unknown_symbol(
                symbol.as_str(),
                error.description,
            ));
        }

        let result = parsed
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                DataUnavailable::unknown_symbol(symbol.as_str(), "empty summary result set")
            })?;

        Ok(result.into_snapshot(symbol.clone()))
    }
}

impl MarketData for YahooClient {
    fn snapshot<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, CompanySnapshot> {
        Box::pin(async move { self.fetch_snapshot(symbol).await })
    }

    fn history<'a>(
        &'a self,
        symbol: &'a Symbol,
        range: DateRange,
        interval: Interval,
    ) -> FetchFuture<'a, OhlcSeries> {
        Box::pin(async move { self.fetch_history(symbol, range, interval).await })
    }

    fn latest_quote<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, LatestQuote> {
        Box::pin(async move { self.fetch_latest_quote(symbol).await })
    }
}

// Wire payloads for the chart endpoint.

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[allow(dead_code)]
    code: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartResult {
    /// Rows with any missing OHLC component are dropped; bars outside the
    /// requested range are dropped too (the provider over-delivers at range
    /// edges in some interval buckets).
    fn into_bars(self, range: &DateRange) -> Vec<OhlcBar> {
        let Some(quote) = self.indicators.quote.first() else {
            return Vec::new();
        };

        let mut bars = Vec::with_capacity(self.timestamp.len());
        for (i, &epoch) in self.timestamp.iter().enumerate() {
            let Ok(ts) = UtcDateTime::from_unix_timestamp(epoch) else {
                continue;
            };
            if !range.contains(ts.date()) {
                continue;
            }

            if let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
                quote.open.get(i),
                quote.high.get(i),
                quote.low.get(i),
                quote.close.get(i),
            ) {
                let volume = quote.volume.get(i).copied().flatten();
                if let Ok(bar) = OhlcBar::new(ts, *open, *high, *low, *close, volume) {
                    bars.push(bar);
                }
            }
        }

        bars
    }

    fn latest_close(&self) -> Option<(UtcDateTime, f64)> {
        let quote = self.indicators.quote.first()?;
        self.timestamp
            .iter()
            .zip(quote.close.iter())
            .rev()
            .find_map(|(&epoch, close)| {
                let ts = UtcDateTime::from_unix_timestamp(epoch).ok()?;
                close.map(|value| (ts, value))
            })
    }
}

// Wire payloads for the quote-summary endpoint. Numeric fields arrive as
// `{ "raw": ..., "fmt": ... }` objects; only `raw` matters here.

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<SummaryResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatisticsModule>,
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfileModule>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<RawNum>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawNum>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<RawNum>,
    #[serde(rename = "regularMarketDayLow")]
    regular_market_day_low: Option<RawNum>,
    #[serde(rename = "regularMarketDayHigh")]
    regular_market_day_high: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawNum>,
    beta: Option<RawNum>,
    #[serde(rename = "fiftyTwoWeekLow")]
    fifty_two_week_low: Option<RawNum>,
    #[serde(rename = "fiftyTwoWeekHigh")]
    fifty_two_week_high: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
struct KeyStatisticsModule {
    beta: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfileModule {
    sector: Option<String>,
    industry: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNum {
    raw: Option<f64>,
}

impl RawNum {
    fn value(option: Option<Self>) -> Option<f64> {
        option.and_then(|num| num.raw).filter(|v| v.is_finite())
    }
}

impl SummaryResult {
    fn into_snapshot(self, symbol: Symbol) -> CompanySnapshot {
        let price = self.price.unwrap_or_default();
        let detail = self.summary_detail.unwrap_or_default();
        let stats = self.key_statistics.unwrap_or_default();
        let profile = self.asset_profile.unwrap_or_default();

        CompanySnapshot {
            symbol: Some(symbol),
            name: price.long_name,
            sector: profile.sector,
            industry: profile.industry,
            country: profile.country,
            current_price: RawNum::value(price.regular_market_price),
            market_cap: RawNum::value(price.market_cap),
            pe_ratio: RawNum::value(detail.trailing_pe),
            beta: RawNum::value(detail.beta).or(RawNum::value(stats.beta)),
            day_low: RawNum::value(price.regular_market_day_low),
            day_high: RawNum::value(price.regular_market_day_high),
            fifty_two_week_low: RawNum::value(detail.fifty_two_week_low),
            fifty_two_week_high: RawNum::value(detail.fifty_two_week_high),
            volume: RawNum::value(price.regular_market_volume).map(|v| v as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn chart_rows_with_missing_components_are_dropped() {
        let result = ChartResult {
            timestamp: vec![1_704_153_600, 1_704_240_000, 1_704_326_400],
            indicators: ChartIndicators {
                quote: vec![ChartQuote {
                    open: vec![Some(10.0), None, Some(12.0)],
                    high: vec![Some(11.0), Some(12.0), Some(13.0)],
                    low: vec![Some(9.0), Some(10.0), Some(11.0)],
                    close: vec![Some(10.5), Some(11.5), Some(12.5)],
                    volume: vec![Some(100), Some(200), None],
                }],
            },
        };

        let range =
            DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31)).expect("valid range");
        let bars = result.into_bars(&range);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 10.5);
        assert_eq!(bars[1].volume, None);
    }

    #[test]
    fn latest_close_skips_trailing_nulls() {
        let result = ChartResult {
            timestamp: vec![1_704_153_600, 1_704_240_000],
            indicators: ChartIndicators {
                quote: vec![ChartQuote {
                    open: vec![Some(10.0), None],
                    high: vec![Some(11.0), None],
                    low: vec![Some(9.0), None],
                    close: vec![Some(10.5), None],
                    volume: vec![Some(100), None],
                }],
            },
        };

        let (_, close) = result.latest_close().expect("one close is present");
        assert_eq!(close, 10.5);
    }

    #[test]
    fn snapshot_maps_missing_modules_to_none() {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        let snapshot = SummaryResult::default().into_snapshot(symbol);

        assert!(snapshot.current_price.is_none());
        assert!(snapshot.sector.is_none());
        assert!(snapshot.volume.is_none());
    }
}
