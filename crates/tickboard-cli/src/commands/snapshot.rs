use tickboard_core::dashboard::snapshot_metrics;
use tickboard_core::provider::MarketData;
use tickboard_core::view::{Section, SectionBody, ViewModel};
use tickboard_core::{Symbol, UtcDateTime};

use crate::cli::SnapshotArgs;
use crate::commands::Clients;
use crate::error::CliError;

pub async fn run(args: &SnapshotArgs, clients: &Clients) -> Result<ViewModel, CliError> {
    let symbols = args
        .symbols
        .iter()
        .map(|raw| Symbol::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut view = ViewModel::new("Snapshots", UtcDateTime::now());

    for symbol in &symbols {
        match clients.market.snapshot(symbol).await {
            Ok(snapshot) => view.push(Section::new(
                symbol.display_label(),
                SectionBody::Metrics {
                    metrics: snapshot_metrics(&snapshot),
                },
            )),
            Err(e) => view.push_error(symbol.display_label(), e.to_string()),
        }
    }

    Ok(view)
}
