//! Behavior-driven tests for dashboard orchestration.
//!
//! These tests verify HOW a render degrades: validation failures stop the
//! pipeline before any fetch, and every later failure stays confined to its
//! own section. The three data seams are scripted fakes with call counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use time::macros::date;

use tickboard_core::dashboard::{
    DashboardModel, DashboardRequest, MovingAverageConfig, SectionToggles,
};
use tickboard_core::econ::{AnnualPoint, AnnualSeries, Country, EconData};
use tickboard_core::news::HeadlineSource;
use tickboard_core::provider::{DataUnavailable, FetchFuture, MarketData};
use tickboard_core::view::{ChartKind, SectionBody, ViewModel};
use tickboard_core::{
    CompanySnapshot, DateRange, Interval, LatestQuote, NewsItem, OhlcBar, OhlcSeries, Symbol,
    UtcDateTime,
};

// =============================================================================
// Scripted seams
// =============================================================================

struct FakeMarket {
    snapshot_calls: AtomicUsize,
    history_calls: AtomicUsize,
    quote_calls: AtomicUsize,
    snapshot_result: Result<CompanySnapshot, DataUnavailable>,
    history_result: Result<OhlcSeries, DataUnavailable>,
    quote_result: Result<LatestQuote, DataUnavailable>,
    fail_quote_for: Option<String>,
}

impl FakeMarket {
    fn healthy() -> Self {
        let symbol = Symbol::parse("AAPL").expect("valid");
        Self {
            snapshot_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            quote_calls: AtomicUsize::new(0),
            snapshot_result: Ok(CompanySnapshot {
                name: Some(String::from("Apple Inc.")),
                current_price: Some(189.95),
                ..CompanySnapshot::for_symbol(symbol.clone())
            }),
            history_result: Ok(sample_series(&symbol)),
            quote_result: Ok(LatestQuote {
                symbol,
                ts: UtcDateTime::parse("2024-03-01T00:00:00Z").expect("valid"),
                close: 5_100.25,
            }),
            fail_quote_for: None,
        }
    }

    fn total_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
            + self.history_calls.load(Ordering::SeqCst)
            + self.quote_calls.load(Ordering::SeqCst)
    }
}

impl MarketData for FakeMarket {
    fn snapshot<'a>(&'a self, _symbol: &'a Symbol) -> FetchFuture<'a, CompanySnapshot> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.snapshot_result.clone();
        Box::pin(async move { result })
    }

    fn history<'a>(
        &'a self,
        _symbol: &'a Symbol,
        _range: DateRange,
        _interval: Interval,
    ) -> FetchFuture<'a, OhlcSeries> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.history_result.clone();
        Box::pin(async move { result })
    }

    fn latest_quote<'a>(&'a self, symbol: &'a Symbol) -> FetchFuture<'a, LatestQuote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_quote_for.as_deref() == Some(symbol.as_str()) {
            Err(DataUnavailable::transport(
                symbol.as_str(),
                "connection failed",
            ))
        } else {
            self.quote_result.clone()
        };
        Box::pin(async move { result })
    }
}

struct FakeEcon {
    calls: AtomicUsize,
    fail_codes: Vec<String>,
}

impl FakeEcon {
    fn healthy() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_codes: Vec::new(),
        }
    }

    fn failing_for(code: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_codes: vec![code.to_owned()],
        }
    }
}

impl EconData for FakeEcon {
    fn gdp_series<'a>(&'a self, country: &'a Country) -> FetchFuture<'a, AnnualSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_codes.iter().any(|code| code == country.code()) {
            Err(DataUnavailable::transport(country.code(), "connection failed"))
        } else {
            Ok(AnnualSeries::new(
                country.clone(),
                vec![
                    AnnualPoint {
                        year: 2020,
                        value: 1.0e12,
                    },
                    AnnualPoint {
                        year: 2021,
                        value: 1.1e12,
                    },
                ],
            ))
        };
        Box::pin(async move { result })
    }
}

struct FakeNews {
    calls: AtomicUsize,
    items: Vec<NewsItem>,
}

impl FakeNews {
    fn with_items(count: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            items: (0..count)
                .map(|i| NewsItem {
                    title: format!("Headline number {i}"),
                    link: format!("https://example.test/news/{i}"),
                })
                .collect(),
        }
    }

    fn empty() -> Self {
        Self::with_items(0)
    }
}

impl HeadlineSource for FakeNews {
    fn top_headlines<'a>(
        &'a self,
        limit: usize,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Vec<NewsItem>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let items: Vec<NewsItem> = self.items.iter().take(limit).cloned().collect();
        Box::pin(async move { items })
    }
}

fn sample_series(symbol: &Symbol) -> OhlcSeries {
    let bars = (0..5)
        .map(|i| {
            let ts = UtcDateTime::from_unix_timestamp(1_704_067_200 + i * 86_400).expect("valid");
            let close = 100.0 + i as f64;
            OhlcBar::new(ts, close, close + 1.0, close - 1.0, close, Some(1_000))
                .expect("bar is valid")
        })
        .collect();
    OhlcSeries::new(symbol.clone(), Interval::Daily, bars)
}

fn model(
    market: Arc<FakeMarket>,
    econ: Arc<FakeEcon>,
    news: Arc<FakeNews>,
) -> DashboardModel {
    DashboardModel::new(market, econ, news)
}

fn request(symbol: &str, toggles: SectionToggles) -> DashboardRequest {
    DashboardRequest {
        symbol: symbol.to_owned(),
        start: date!(2024 - 01 - 01),
        end: date!(2024 - 03 - 01),
        interval: Interval::Daily,
        chart_kind: ChartKind::Candlestick,
        moving_averages: Some(MovingAverageConfig {
            short_period: 2,
            long_period: 3,
        }),
        countries: vec![String::from("USA"), String::from("CHN")],
        toggles,
    }
}

fn headings(view: &ViewModel) -> Vec<&str> {
    view.sections
        .iter()
        .map(|section| section.heading.as_str())
        .collect()
}

// =============================================================================
// Validation short-circuits the pipeline
// =============================================================================

#[tokio::test]
async fn when_the_symbol_is_invalid_nothing_is_fetched() {
    // Given: a request with a malformed symbol and every section enabled
    let market = Arc::new(FakeMarket::healthy());
    let econ = Arc::new(FakeEcon::healthy());
    let news = Arc::new(FakeNews::with_items(5));
    let model = model(Arc::clone(&market), Arc::clone(&econ), Arc::clone(&news));

    // When: the dashboard renders
    let view = model
        .render(&request("AAPL$", SectionToggles::all()))
        .await;

    // Then: a single error section and zero calls on any seam
    assert!(view.has_errors());
    assert_eq!(view.sections.len(), 1);
    assert_eq!(market.total_calls(), 0);
    assert_eq!(econ.calls.load(Ordering::SeqCst), 0);
    assert_eq!(news.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn when_the_range_is_inverted_nothing_is_fetched() {
    // Given: a request whose start date is after its end date
    let market = Arc::new(FakeMarket::healthy());
    let econ = Arc::new(FakeEcon::healthy());
    let news = Arc::new(FakeNews::with_items(5));
    let model = model(Arc::clone(&market), Arc::clone(&econ), Arc::clone(&news));

    let mut req = request("AAPL", SectionToggles::all());
    req.start = date!(2024 - 06 - 01);
    req.end = date!(2024 - 01 - 01);

    // When / Then
    let view = model.render(&req).await;
    assert!(view.has_errors());
    assert_eq!(view.sections.len(), 1);
    assert_eq!(market.total_calls(), 0);
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn a_healthy_render_assembles_every_section_in_order() {
    // Given: healthy seams
    let market = Arc::new(FakeMarket::healthy());
    let model = model(
        Arc::clone(&market),
        Arc::new(FakeEcon::healthy()),
        Arc::new(FakeNews::with_items(8)),
    );

    // When
    let view = model.render(&request("aapl", SectionToggles::all())).await;

    // Then: no errors, the title uses the normalized symbol, and the
    // fixed sections appear in pipeline order
    assert!(!view.has_errors());
    assert_eq!(view.title, "AAPL dashboard");

    let headings = headings(&view);
    let expected_head = [
        "Indices",
        "Currencies",
        "Company",
        "Price history",
        "Summary statistics",
        "GDP comparison",
        "Latest GDP",
    ];
    assert_eq!(&headings[..expected_head.len()], &expected_head);
    assert_eq!(headings.last(), Some(&"Latest news"));

    // The news section is capped at the configured limit
    let news_items = view
        .sections
        .iter()
        .find_map(|section| match &section.body {
            SectionBody::Headlines { items } => Some(items),
            _ => None,
        })
        .expect("headline section present");
    assert_eq!(news_items.len(), 5);
}

#[tokio::test]
async fn the_price_chart_carries_candles_and_both_moving_averages() {
    // Given: healthy seams and overlays of 2 and 3 bars
    let model = model(
        Arc::new(FakeMarket::healthy()),
        Arc::new(FakeEcon::healthy()),
        Arc::new(FakeNews::empty()),
    );

    // When
    let view = model.render(&request("AAPL", SectionToggles::none())).await;

    // Then
    let chart = view
        .sections
        .iter()
        .find_map(|section| match &section.body {
            SectionBody::Chart { chart } => Some(chart),
            _ => None,
        })
        .expect("price chart present");

    let candles = chart.candles.as_ref().expect("candlestick mode");
    assert_eq!(candles.points.len(), 5);

    let names: Vec<&str> = chart.lines.iter().map(|line| line.name.as_str()).collect();
    assert_eq!(names, vec!["MA 2", "MA 3"]);
    assert!(chart.lines[0].points[0].y.is_none(), "warm-up point is empty");
    assert!(chart.lines[0].points[4].y.is_some());
}

// =============================================================================
// Fault isolation
// =============================================================================

#[tokio::test]
async fn a_failed_snapshot_does_not_take_down_the_history_sections() {
    // Given: the snapshot fails but history is fine
    let mut market = FakeMarket::healthy();
    market.snapshot_result = Err(DataUnavailable::transport("AAPL", "connection failed"));
    let model = model(
        Arc::new(market),
        Arc::new(FakeEcon::healthy()),
        Arc::new(FakeNews::empty()),
    );

    // When
    let view = model.render(&request("AAPL", SectionToggles::none())).await;

    // Then: the company section is an inline error, the rest render
    assert!(view.has_errors());
    let headings = headings(&view);
    assert_eq!(headings, vec!["Company", "Price history", "Summary statistics"]);
    assert!(matches!(
        view.sections[0].body,
        SectionBody::Error { .. }
    ));
}

#[tokio::test]
async fn a_failed_board_quote_renders_as_a_missing_metric() {
    // Given: every latest-quote call fails
    let mut market = FakeMarket::healthy();
    market.quote_result = Err(DataUnavailable::rate_limited("^GSPC"));
    let model = model(
        Arc::new(market),
        Arc::new(FakeEcon::healthy()),
        Arc::new(FakeNews::empty()),
    );

    let toggles = SectionToggles {
        include_indices: true,
        ..SectionToggles::none()
    };

    // When
    let view = model.render(&request("AAPL", toggles)).await;

    // Then: the board section exists with every entry present as N/A,
    // and the board failure is not a view-level error
    let board = view
        .sections
        .iter()
        .find(|section| section.heading == "Indices")
        .expect("board present");
    match &board.body {
        SectionBody::Metrics { metrics } => {
            assert_eq!(metrics.len(), 6);
            assert!(metrics.iter().all(|m| m.value.to_string() == "N/A"));
        }
        other => panic!("expected metrics, got {other:?}"),
    }
    assert!(!view.has_errors());
}

#[tokio::test]
async fn one_bad_board_symbol_leaves_the_other_entries_intact() {
    // Given: only the FTSE quote fails
    let mut market = FakeMarket::healthy();
    market.fail_quote_for = Some(String::from("^FTSE"));
    let model = model(
        Arc::new(market),
        Arc::new(FakeEcon::healthy()),
        Arc::new(FakeNews::empty()),
    );

    let toggles = SectionToggles {
        include_indices: true,
        ..SectionToggles::none()
    };

    // When
    let view = model.render(&request("AAPL", toggles)).await;

    // Then: five values and exactly one explicit N/A marker
    let board = view
        .sections
        .iter()
        .find(|section| section.heading == "Indices")
        .expect("board present");
    match &board.body {
        SectionBody::Metrics { metrics } => {
            assert_eq!(metrics.len(), 6);
            let missing: Vec<&str> = metrics
                .iter()
                .filter(|m| m.value.to_string() == "N/A")
                .map(|m| m.label.as_str())
                .collect();
            assert_eq!(missing, vec!["FTSE 100"]);
        }
        other => panic!("expected metrics, got {other:?}"),
    }
}

#[tokio::test]
async fn a_failed_country_is_reported_next_to_the_surviving_gdp_chart() {
    // Given: China fails, the United States succeeds
    let model = model(
        Arc::new(FakeMarket::healthy()),
        Arc::new(FakeEcon::failing_for("CHN")),
        Arc::new(FakeNews::empty()),
    );

    let toggles = SectionToggles {
        include_gdp: true,
        ..SectionToggles::none()
    };

    // When
    let view = model.render(&request("AAPL", toggles)).await;

    // Then: the chart renders with one line and the failure is surfaced
    let chart = view
        .sections
        .iter()
        .find_map(|section| match &section.body {
            SectionBody::Chart { chart } => Some(chart),
            _ => None,
        })
        .expect("gdp chart present");
    assert_eq!(chart.lines.len(), 1);
    assert_eq!(chart.lines[0].name, "United States");
    assert!(view.has_errors());
}

#[tokio::test]
async fn an_empty_headline_feed_renders_as_an_unavailable_placeholder() {
    // Given: the scraper yields nothing
    let model = model(
        Arc::new(FakeMarket::healthy()),
        Arc::new(FakeEcon::healthy()),
        Arc::new(FakeNews::empty()),
    );

    let toggles = SectionToggles {
        include_news: true,
        ..SectionToggles::none()
    };

    // When
    let view = model.render(&request("AAPL", toggles)).await;

    // Then: a placeholder, not an error
    let news = view
        .sections
        .iter()
        .find(|section| section.heading == "Latest news")
        .expect("news section present");
    assert!(matches!(news.body, SectionBody::Unavailable { .. }));
    assert!(!view.has_errors());
}
