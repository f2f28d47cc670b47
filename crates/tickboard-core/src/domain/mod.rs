mod date_range;
mod interval;
mod models;
mod symbol;
mod timestamp;

pub use date_range::{format_date, parse_date, DateRange};
pub use interval::Interval;
pub use models::{CompanySnapshot, LatestQuote, NewsItem, OhlcBar, OhlcSeries};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
