//! CLI argument definitions for tickboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | Render the full dashboard for a symbol |
//! | `snapshot` | Fetch company snapshot(s) |
//! | `history` | Fetch historical OHLCV bars with summary stats |
//! | `quote` | Fetch the latest close for symbol(s) |
//! | `news` | Scrape the top market headlines |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `text` | Output format (text, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `10000` | Per-request timeout in ms |

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tickboard - market dashboard in your terminal
///
/// Fetches quotes, history, company snapshots, macro series, and headlines,
/// then assembles them into a dashboard that degrades section-by-section
/// instead of failing whole.
#[derive(Debug, Parser)]
#[command(
    name = "tickboard",
    author,
    version,
    about = "Market dashboard in your terminal"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sections for terminal display.
    Text,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the full dashboard for a symbol.
    ///
    /// Includes index and currency boards, company snapshot, price chart
    /// with moving averages, summary statistics, GDP comparison, market
    /// category lists, and top headlines. Sections that fail render as
    /// inline errors.
    ///
    /// # Examples
    ///
    ///   tickboard dashboard AAPL --start 2024-01-01 --end 2024-06-30
    ///   tickboard dashboard ^GSPC --chart line --skip-news
    Dashboard(DashboardArgs),

    /// Fetch company snapshot(s).
    ///
    /// # Examples
    ///
    ///   tickboard snapshot AAPL
    ///   tickboard snapshot AAPL MSFT --format json --pretty
    Snapshot(SnapshotArgs),

    /// Fetch historical OHLCV bars with summary statistics.
    ///
    /// # Examples
    ///
    ///   tickboard history AAPL --start 2024-01-01 --end 2024-06-30
    ///   tickboard history USDJPY=X --interval 1wk
    History(HistoryArgs),

    /// Fetch the latest close for one or more symbols.
    ///
    /// # Examples
    ///
    ///   tickboard quote ^GSPC ^DJI ^IXIC
    Quote(QuoteArgs),

    /// Scrape the top market headlines.
    ///
    /// # Examples
    ///
    ///   tickboard news --limit 5
    News(NewsArgs),
}

/// Arguments for the `dashboard` command.
#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Primary symbol (e.g., AAPL, ^GSPC, USDJPY=X).
    pub symbol: String,

    /// History window start date (YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-01")]
    pub start: String,

    /// History window end date (YYYY-MM-DD).
    #[arg(long, default_value = "2024-12-31")]
    pub end: String,

    /// Bar interval: 1d, 5d, 1wk, 1mo, or 3mo.
    #[arg(long, default_value = "1d")]
    pub interval: String,

    /// Chart style for the price section.
    #[arg(long, value_enum, default_value_t = ChartStyle::Candlestick)]
    pub chart: ChartStyle,

    /// Short moving-average window in bars.
    #[arg(long, default_value_t = 20)]
    pub ma_short: usize,

    /// Long moving-average window in bars.
    #[arg(long, default_value_t = 100)]
    pub ma_long: usize,

    /// Disable moving-average overlays.
    #[arg(long, default_value_t = false)]
    pub no_ma: bool,

    /// ISO alpha-3 country codes for the GDP comparison.
    #[arg(long, value_delimiter = ',', default_value = "USA,CHN,JPN")]
    pub countries: Vec<String>,

    /// Skip the headline section.
    #[arg(long, default_value_t = false)]
    pub skip_news: bool,

    /// Skip the index quote board.
    #[arg(long, default_value_t = false)]
    pub skip_indices: bool,

    /// Skip the currency quote board.
    #[arg(long, default_value_t = false)]
    pub skip_currencies: bool,

    /// Skip the GDP comparison section.
    #[arg(long, default_value_t = false)]
    pub skip_gdp: bool,

    /// Skip the market category lists.
    #[arg(long, default_value_t = false)]
    pub skip_categories: bool,
}

/// Chart style choices for the price section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartStyle {
    Line,
    Candlestick,
}

/// Arguments for the `snapshot` command.
#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// One or more market symbols.
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

/// Arguments for the `history` command.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Market symbol to fetch bars for.
    pub symbol: String,

    /// History window start date (YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-01")]
    pub start: String,

    /// History window end date (YYYY-MM-DD).
    #[arg(long, default_value = "2024-12-31")]
    pub end: String,

    /// Bar interval: 1d, 5d, 1wk, 1mo, or 3mo.
    #[arg(long, default_value = "1d")]
    pub interval: String,
}

/// Arguments for the `quote` command.
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// One or more market symbols.
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

/// Arguments for the `news` command.
#[derive(Debug, Args)]
pub struct NewsArgs {
    /// Maximum number of headlines to return.
    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}
