use tickboard_core::dashboard::{price_chart, summary_table};
use tickboard_core::provider::MarketData;
use tickboard_core::view::{ChartKind, Section, SectionBody, ViewModel};
use tickboard_core::{DateRange, Interval, Symbol, UtcDateTime};

use crate::cli::HistoryArgs;
use crate::commands::Clients;
use crate::error::CliError;

pub async fn run(args: &HistoryArgs, clients: &Clients) -> Result<ViewModel, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let range = DateRange::parse(&args.start, &args.end)?;
    let interval: Interval = args.interval.parse()?;

    let series = clients.market.history(&symbol, range, interval).await?;

    let mut view = ViewModel::new(
        format!("{} history {range}", symbol.display_label()),
        UtcDateTime::now(),
    );
    view.push(Section::new(
        "Price history",
        SectionBody::Chart {
            chart: price_chart(&series, &symbol, ChartKind::Line, None),
        },
    ));
    view.push(Section::new(
        "Summary statistics",
        SectionBody::Table {
            table: summary_table(&series),
        },
    ));

    Ok(view)
}
