use std::sync::Arc;

use tickboard_core::dashboard::{
    DashboardModel, DashboardRequest, MovingAverageConfig, SectionToggles,
};
use tickboard_core::view::{ChartKind, ViewModel};
use tickboard_core::{parse_date, Interval};

use crate::cli::{ChartStyle, DashboardArgs};
use crate::commands::Clients;
use crate::error::CliError;

pub async fn run(args: &DashboardArgs, clients: &Clients) -> Result<ViewModel, CliError> {
    let start = parse_date(&args.start)?;
    let end = parse_date(&args.end)?;
    let interval: Interval = args.interval.parse()?;

    let moving_averages = if args.no_ma {
        None
    } else {
        Some(MovingAverageConfig {
            short_period: args.ma_short.max(1),
            long_period: args.ma_long.max(1),
        })
    };

    let request = DashboardRequest {
        symbol: args.symbol.clone(),
        start,
        end,
        interval,
        chart_kind: match args.chart {
            ChartStyle::Line => ChartKind::Line,
            ChartStyle::Candlestick => ChartKind::Candlestick,
        },
        moving_averages,
        countries: args.countries.clone(),
        toggles: SectionToggles {
            include_news: !args.skip_news,
            include_indices: !args.skip_indices,
            include_currencies: !args.skip_currencies,
            include_gdp: !args.skip_gdp,
            include_category_lists: !args.skip_categories,
        },
    };

    let market: Arc<dyn tickboard_core::provider::MarketData> = clients.market.clone();
    let econ: Arc<dyn tickboard_core::econ::EconData> = clients.econ.clone();
    let news: Arc<dyn tickboard_core::news::HeadlineSource> = clients.news.clone();
    let model = DashboardModel::new(market, econ, news);

    Ok(model.render(&request).await)
}
