use tickboard_core::provider::MarketData;
use tickboard_core::view::{Metric, MetricValue, Section, SectionBody, ViewModel};
use tickboard_core::{Symbol, UtcDateTime};

use crate::cli::QuoteArgs;
use crate::commands::Clients;
use crate::error::CliError;

pub async fn run(args: &QuoteArgs, clients: &Clients) -> Result<ViewModel, CliError> {
    let symbols = args
        .symbols
        .iter()
        .map(|raw| Symbol::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut view = ViewModel::new("Quotes", UtcDateTime::now());
    let mut metrics = Vec::with_capacity(symbols.len());

    for symbol in &symbols {
        match clients.market.latest_quote(symbol).await {
            Ok(quote) => metrics.push(Metric::new(
                symbol.display_label(),
                MetricValue::from_number(Some(quote.close)),
            )),
            Err(e) => view.push_error(symbol.display_label(), e.to_string()),
        }
    }

    if !metrics.is_empty() {
        view.push(Section::new("Quotes", SectionBody::Metrics { metrics }));
    }

    Ok(view)
}
