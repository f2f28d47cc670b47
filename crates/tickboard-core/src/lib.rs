//! Core library for tickboard, a market dashboard pipeline.
//!
//! The crate is organized around three seams the orchestrator depends on:
//! [`provider::MarketData`] for quotes and history, [`econ::EconData`] for
//! annual macro series, and [`news::HeadlineSource`] for the headline strip.
//! Production adapters ([`provider::YahooClient`], [`econ::WorldBankClient`],
//! [`news::NewsScraper`]) share one [`http_client::HttpClient`] transport;
//! tests substitute scripted transports or scripted seams directly.
//!
//! [`dashboard::DashboardModel`] composes the seams into a [`view::ViewModel`]
//! render that degrades section-by-section instead of failing whole.

pub mod dashboard;
mod domain;
pub mod econ;
mod error;
pub mod http_client;
pub mod news;
pub mod provider;
pub mod transform;
pub mod view;

pub use domain::{
    format_date, parse_date, CompanySnapshot, DateRange, Interval, LatestQuote, NewsItem, OhlcBar,
    OhlcSeries, Symbol, UtcDateTime,
};
pub use error::ValidationError;
