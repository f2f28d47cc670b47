//! Dashboard orchestration.
//!
//! [`DashboardModel::render`] turns one [`DashboardRequest`] into a
//! [`ViewModel`]. The pipeline is validate, fetch the primary symbol,
//! enrich with transforms, fetch auxiliary boards, fetch news, assemble.
//! Validation failures short-circuit before any fetch; every later failure
//! is confined to its own section so one bad symbol or one slow endpoint
//! never blanks the rest of the board.

use std::sync::Arc;

use log::warn;
use time::Date;

use crate::econ::{country_catalog, AnnualSeries, Country, EconData};
use crate::news::HeadlineSource;
use crate::provider::MarketData;
use crate::transform::{align_and_merge, describe, moving_average, PriceField};
use crate::view::{
    CandlePoint, CandleSeries, ChartKind, ChartSpec, LinePoint, LineSeries, Metric, MetricValue,
    Section, SectionBody, TableSpec, ViewModel,
};
use crate::{
    format_date, CompanySnapshot, DateRange, Interval, OhlcSeries, Symbol, UtcDateTime,
};

/// Which optional sections a render includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionToggles {
    pub include_news: bool,
    pub include_indices: bool,
    pub include_currencies: bool,
    pub include_gdp: bool,
    pub include_category_lists: bool,
}

impl SectionToggles {
    pub const fn all() -> Self {
        Self {
            include_news: true,
            include_indices: true,
            include_currencies: true,
            include_gdp: true,
            include_category_lists: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            include_news: false,
            include_indices: false,
            include_currencies: false,
            include_gdp: false,
            include_category_lists: false,
        }
    }
}

impl Default for SectionToggles {
    fn default() -> Self {
        Self::all()
    }
}

/// Moving-average overlay windows for the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverageConfig {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            short_period: 20,
            long_period: 100,
        }
    }
}

/// One dashboard render request, raw user input included.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub symbol: String,
    pub start: Date,
    pub end: Date,
    pub interval: Interval,
    pub chart_kind: ChartKind,
    pub moving_averages: Option<MovingAverageConfig>,
    /// ISO alpha-3 codes for the GDP comparison, resolved against the
    /// built-in catalog first.
    pub countries: Vec<String>,
    pub toggles: SectionToggles,
}

/// Labeled symbol shown on a quote board.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBoardEntry {
    pub label: String,
    pub symbol: Symbol,
}

/// Named list of symbols rendered as a snapshot table.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryList {
    pub name: String,
    pub symbols: Vec<Symbol>,
}

fn board_entry(label: &str, symbol: &str) -> Option<QuoteBoardEntry> {
    Symbol::parse(symbol).ok().map(|symbol| QuoteBoardEntry {
        label: label.to_owned(),
        symbol,
    })
}

/// Index board shown above the primary chart.
pub fn default_index_board() -> Vec<QuoteBoardEntry> {
    [
        ("S&P 500", "^GSPC"),
        ("Dow Jones", "^DJI"),
        ("Nasdaq", "^IXIC"),
        ("FTSE 100", "^FTSE"),
        ("Nikkei 225", "^N225"),
        ("Hang Seng", "^HSI"),
    ]
    .into_iter()
    .filter_map(|(label, symbol)| board_entry(label, symbol))
    .collect()
}

/// Currency board shown next to the index board.
pub fn default_currency_board() -> Vec<QuoteBoardEntry> {
    [
        ("USD/JPY", "USDJPY=X"),
        ("EUR/USD", "EURUSD=X"),
        ("GBP/USD", "GBPUSD=X"),
    ]
    .into_iter()
    .filter_map(|(label, symbol)| board_entry(label, symbol))
    .collect()
}

/// Curated category lists mirroring the market-movers screens.
pub fn default_category_lists() -> Vec<CategoryList> {
    let list = |name: &str, symbols: &[&str]| CategoryList {
        name: name.to_owned(),
        symbols: symbols
            .iter()
            .filter_map(|symbol| Symbol::parse(symbol).ok())
            .collect(),
    };

    vec![
        list("Most Active", &["TSLA", "NVDA", "AAPL", "AMD", "PLTR"]),
        list("Trending Now", &["SMCI", "COIN", "MARA", "RIOT", "SOFI"]),
        list("Top Gainers", &["AVGO", "LLY", "META", "NFLX", "CRWD"]),
        list("Top Losers", &["INTC", "BA", "NKE", "WBA", "LUV"]),
        list("52-Week Gainers", &["NVDA", "LLY", "AVGO", "COST", "AMZN"]),
        list("52-Week Losers", &["WBA", "DG", "MRNA", "PFE", "EL"]),
    ]
}

/// Dashboard orchestrator over the three data seams.
pub struct DashboardModel {
    market: Arc<dyn MarketData>,
    econ: Arc<dyn EconData>,
    news: Arc<dyn HeadlineSource>,
    indices: Vec<QuoteBoardEntry>,
    currencies: Vec<QuoteBoardEntry>,
    categories: Vec<CategoryList>,
    news_limit: usize,
}

impl DashboardModel {
    pub fn new(
        market: Arc<dyn MarketData>,
        econ: Arc<dyn EconData>,
        news: Arc<dyn HeadlineSource>,
    ) -> Self {
        Self {
            market,
            econ,
            news,
            indices: default_index_board(),
            currencies: default_currency_board(),
            categories: default_category_lists(),
            news_limit: 5,
        }
    }

    pub fn with_boards(
        mut self,
        indices: Vec<QuoteBoardEntry>,
        currencies: Vec<QuoteBoardEntry>,
    ) -> Self {
        self.indices = indices;
        self.currencies = currencies;
        self
    }

    pub fn with_categories(mut self, categories: Vec<CategoryList>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_news_limit(mut self, limit: usize) -> Self {
        self.news_limit = limit;
        self
    }

    /// Render one request. Never fails as a whole; an invalid request
    /// produces a view with a single error section and no fetches.
    pub async fn render(&self, request: &DashboardRequest) -> ViewModel {
        let generated_at = UtcDateTime::now();

        let symbol = match Symbol::parse(&request.symbol) {
            Ok(symbol) => symbol,
            Err(e) => {
                let mut view = ViewModel::new("Dashboard", generated_at);
                view.push_error("Request", e.to_string());
                return view;
            }
        };

        let range = match DateRange::new(request.start, request.end) {
            Ok(range) => range,
            Err(e) => {
                let mut view = ViewModel::new("Dashboard", generated_at);
                view.push_error("Request", e.to_string());
                return view;
            }
        };

        let mut view = ViewModel::new(
            format!("{} dashboard", symbol.display_label()),
            generated_at,
        );

        // Primary symbol fetches come first; the boards are auxiliary even
        // though they render above the chart.
        let primary = self.primary_sections(&symbol, range, request).await;

        if request.toggles.include_indices {
            view.push(self.quote_board("Indices", &self.indices).await);
        }
        if request.toggles.include_currencies {
            view.push(self.quote_board("Currencies", &self.currencies).await);
        }
        for section in primary {
            view.push(section);
        }

        if request.toggles.include_gdp {
            self.gdp_section(&mut view, &request.countries).await;
        }
        if request.toggles.include_category_lists {
            self.category_sections(&mut view).await;
        }
        if request.toggles.include_news {
            self.news_section(&mut view).await;
        }

        view
    }

    async fn primary_sections(
        &self,
        symbol: &Symbol,
        range: DateRange,
        request: &DashboardRequest,
    ) -> Vec<Section> {
        let mut sections = Vec::new();

        match self.market.snapshot(symbol).await {
            Ok(snapshot) => sections.push(Section::new(
                "Company",
                SectionBody::Metrics {
                    metrics: snapshot_metrics(&snapshot),
                },
            )),
            Err(e) => {
                warn!("snapshot fetch failed: {e}");
                sections.push(Section::new(
                    "Company",
                    SectionBody::Error {
                        message: e.to_string(),
                    },
                ));
            }
        }

        match self.market.history(symbol, range, request.interval).await {
            Ok(series) => {
                sections.push(Section::new(
                    "Price history",
                    SectionBody::Chart {
                        chart: price_chart(
                            &series,
                            symbol,
                            request.chart_kind,
                            request.moving_averages,
                        ),
                    },
                ));
                sections.push(Section::new(
                    "Summary statistics",
                    SectionBody::Table {
                        table: summary_table(&series),
                    },
                ));
            }
            Err(e) => {
                warn!("history fetch failed: {e}");
                sections.push(Section::new(
                    "Price history",
                    SectionBody::Error {
                        message: e.to_string(),
                    },
                ));
            }
        }

        sections
    }

    /// Each board entry is fetched in isolation; a failed entry renders
    /// as a missing metric instead of dropping the board.
    async fn quote_board(&self, heading: &str, entries: &[QuoteBoardEntry]) -> Section {
        let mut metrics = Vec::with_capacity(entries.len());

        for entry in entries {
            let value = match self.market.latest_quote(&entry.symbol).await {
                Ok(quote) => MetricValue::from_number(Some(quote.close)),
                Err(e) => {
                    warn!("quote board fetch failed: {e}");
                    MetricValue::Missing
                }
            };
            metrics.push(Metric::new(entry.label.clone(), value));
        }

        Section::new(heading, SectionBody::Metrics { metrics })
    }

    async fn gdp_section(&self, view: &mut ViewModel, codes: &[String]) {
        if codes.is_empty() {
            return;
        }

        let mut fetched: Vec<AnnualSeries> = Vec::new();
        let mut failed: Vec<String> = Vec::new();

        for code in codes {
            let country = match resolve_country(code) {
                Ok(country) => country,
                Err(reason) => {
                    failed.push(reason);
                    continue;
                }
            };

            match self.econ.gdp_series(&country).await {
                Ok(series) => fetched.push(series),
                Err(e) => {
                    warn!("gdp fetch failed: {e}");
                    failed.push(e.to_string());
                }
            }
        }

        if fetched.is_empty() {
            let reason = if failed.is_empty() {
                String::from("no countries selected")
            } else {
                failed.join("; ")
            };
            view.push_unavailable("GDP comparison", reason);
            return;
        }

        let keyed: Vec<(String, Vec<(i32, f64)>)> = fetched
            .iter()
            .map(|series| {
                (
                    series.country.name().to_owned(),
                    series
                        .points()
                        .iter()
                        .map(|point| (point.year, point.value))
                        .collect(),
                )
            })
            .collect();
        let table = align_and_merge(&keyed);

        let lines = table
            .columns
            .iter()
            .enumerate()
            .map(|(column, name)| LineSeries {
                name: name.clone(),
                points: table
                    .rows
                    .iter()
                    .map(|row| LinePoint {
                        x: row.key.to_string(),
                        y: row.values[column],
                    })
                    .collect(),
            })
            .collect();

        view.push(Section::new(
            "GDP comparison",
            SectionBody::Chart {
                chart: ChartSpec {
                    title: String::from("GDP, current US$"),
                    kind: ChartKind::Line,
                    candles: None,
                    lines,
                },
            },
        ));

        let metrics = fetched
            .iter()
            .map(|series| {
                let latest = series
                    .latest()
                    .map(|point| MetricValue::Number(point.value))
                    .unwrap_or(MetricValue::Missing);
                Metric::new(series.country.name().to_owned(), latest)
            })
            .collect();
        view.push(Section::new(
            "Latest GDP",
            SectionBody::Metrics { metrics },
        ));

        for reason in failed {
            view.push_error("GDP comparison", reason);
        }
    }

    async fn category_sections(&self, view: &mut ViewModel) {
        for category in &self.categories {
            let mut rows = Vec::with_capacity(category.symbols.len());

            for symbol in &category.symbols {
                let row = match self.market.snapshot(symbol).await {
                    Ok(snapshot) => category_row(symbol, &snapshot),
                    Err(e) => {
                        warn!("category snapshot failed: {e}");
                        let mut row = vec![symbol.display_label().to_owned()];
                        row.extend(std::iter::repeat(String::from("N/A")).take(4));
                        row
                    }
                };
                rows.push(row);
            }

            view.push(Section::new(
                category.name.clone(),
                SectionBody::Table {
                    table: TableSpec {
                        columns: vec![
                            String::from("Symbol"),
                            String::from("Name"),
                            String::from("Price"),
                            String::from("Market cap"),
                            String::from("Volume"),
                        ],
                        rows,
                    },
                },
            ));
        }
    }

    async fn news_section(&self, view: &mut ViewModel) {
        let items = self.news.top_headlines(self.news_limit).await;
        if items.is_empty() {
            view.push_unavailable("Latest news", "no headlines available right now");
        } else {
            view.push(Section::new("Latest news", SectionBody::Headlines { items }));
        }
    }
}

fn resolve_country(code: &str) -> Result<Country, String> {
    let normalized = code.trim().to_ascii_uppercase();
    if let Some(known) = country_catalog()
        .into_iter()
        .find(|country| country.code() == normalized)
    {
        return Ok(known);
    }

    Country::new(normalized.clone(), &normalized).map_err(|e| e.to_string())
}

/// Metric rows for a company snapshot, missing fields rendered as `Missing`.
pub fn snapshot_metrics(snapshot: &CompanySnapshot) -> Vec<Metric> {
    vec![
        Metric::new("Name", MetricValue::from_text(snapshot.name.clone())),
        Metric::new("Sector", MetricValue::from_text(snapshot.sector.clone())),
        Metric::new(
            "Industry",
            MetricValue::from_text(snapshot.industry.clone()),
        ),
        Metric::new("Country", MetricValue::from_text(snapshot.country.clone())),
        Metric::new(
            "Current price",
            MetricValue::from_number(snapshot.current_price),
        ),
        Metric::new("Market cap", MetricValue::from_number(snapshot.market_cap)),
        Metric::new("P/E ratio", MetricValue::from_number(snapshot.pe_ratio)),
        Metric::new("Beta", MetricValue::from_number(snapshot.beta)),
        Metric::new("Day low", MetricValue::from_number(snapshot.day_low)),
        Metric::new("Day high", MetricValue::from_number(snapshot.day_high)),
        Metric::new(
            "52-week low",
            MetricValue::from_number(snapshot.fifty_two_week_low),
        ),
        Metric::new(
            "52-week high",
            MetricValue::from_number(snapshot.fifty_two_week_high),
        ),
        Metric::new("Volume", MetricValue::from_count(snapshot.volume)),
    ]
}

fn category_row(symbol: &Symbol, snapshot: &CompanySnapshot) -> Vec<String> {
    vec![
        symbol.display_label().to_owned(),
        MetricValue::from_text(snapshot.name.clone()).to_string(),
        MetricValue::from_number(snapshot.current_price).to_string(),
        MetricValue::from_number(snapshot.market_cap).to_string(),
        MetricValue::from_count(snapshot.volume).to_string(),
    ]
}

/// Chart spec for a price series with optional moving-average overlays.
pub fn price_chart(
    series: &OhlcSeries,
    symbol: &Symbol,
    chart_kind: ChartKind,
    moving_averages: Option<MovingAverageConfig>,
) -> ChartSpec {
    let labels: Vec<String> = series
        .bars()
        .iter()
        .map(|bar| format_date(bar.ts.date()))
        .collect();

    let candles = match chart_kind {
        ChartKind::Candlestick => Some(CandleSeries {
            name: symbol.display_label().to_owned(),
            points: series
                .bars()
                .iter()
                .zip(&labels)
                .map(|(bar, label)| CandlePoint {
                    x: label.clone(),
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                })
                .collect(),
        }),
        ChartKind::Line => None,
    };

    let mut lines = Vec::new();
    if matches!(chart_kind, ChartKind::Line) {
        lines.push(LineSeries {
            name: String::from("Close"),
            points: series
                .bars()
                .iter()
                .zip(&labels)
                .map(|(bar, label)| LinePoint {
                    x: label.clone(),
                    y: Some(bar.close),
                })
                .collect(),
        });
    }

    if let Some(config) = moving_averages {
        for period in [config.short_period, config.long_period] {
            // A zero window is the only invalid input here; skip it.
            let Ok(ma) = moving_average(series, PriceField::Close, period) else {
                continue;
            };
            lines.push(LineSeries {
                name: format!("MA {period}"),
                points: ma
                    .points()
                    .iter()
                    .zip(&labels)
                    .map(|(point, label)| LinePoint {
                        x: label.clone(),
                        y: point.value,
                    })
                    .collect(),
            });
        }
    }

    ChartSpec {
        title: format!("{} price", symbol.display_label()),
        kind: chart_kind,
        candles,
        lines,
    }
}

/// Descriptive-statistics table for a price series, one row per field.
pub fn summary_table(series: &OhlcSeries) -> TableSpec {
    let summary = describe(series);
    let columns = vec![
        String::from("Field"),
        String::from("Count"),
        String::from("Mean"),
        String::from("Std dev"),
        String::from("Min"),
        String::from("25%"),
        String::from("50%"),
        String::from("75%"),
        String::from("Max"),
    ];

    let rows = summary
        .fields
        .iter()
        .map(|field| {
            vec![
                field.name.to_owned(),
                field.stats.count.to_string(),
                format!("{:.2}", field.stats.mean),
                format!("{:.2}", field.stats.std_dev),
                format!("{:.2}", field.stats.min),
                format!("{:.2}", field.stats.p25),
                format!("{:.2}", field.stats.p50),
                format!("{:.2}", field.stats.p75),
                format!("{:.2}", field.stats.max),
            ]
        })
        .collect();

    TableSpec { columns, rows }
}
