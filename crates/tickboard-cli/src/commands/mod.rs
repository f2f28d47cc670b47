mod dashboard;
mod history;
mod news;
mod quote;
mod snapshot;

use std::sync::Arc;

use tickboard_core::econ::{WorldBankClient, WorldBankConfig};
use tickboard_core::http_client::{HttpClient, ReqwestHttpClient};
use tickboard_core::news::{NewsScraper, ScraperConfig};
use tickboard_core::provider::{ProviderConfig, YahooClient};
use tickboard_core::view::ViewModel;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Production adapters shared by all commands.
pub struct Clients {
    pub market: Arc<YahooClient>,
    pub econ: Arc<WorldBankClient>,
    pub news: Arc<NewsScraper>,
}

impl Clients {
    fn new(timeout_ms: u64) -> Self {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

        let market = Arc::new(YahooClient::new(
            Arc::clone(&http),
            ProviderConfig {
                timeout_ms,
                ..ProviderConfig::default()
            },
        ));
        let econ = Arc::new(WorldBankClient::new(
            Arc::clone(&http),
            WorldBankConfig {
                timeout_ms,
                ..WorldBankConfig::default()
            },
        ));
        let news = Arc::new(NewsScraper::new(
            http,
            ScraperConfig {
                timeout_ms,
                ..ScraperConfig::default()
            },
        ));

        Self { market, econ, news }
    }
}

pub async fn run(cli: &Cli) -> Result<ViewModel, CliError> {
    let clients = Clients::new(cli.timeout_ms);

    match &cli.command {
        Command::Dashboard(args) => dashboard::run(args, &clients).await,
        Command::Snapshot(args) => snapshot::run(args, &clients).await,
        Command::History(args) => history::run(args, &clients).await,
        Command::Quote(args) => quote::run(args, &clients).await,
        Command::News(args) => news::run(args, &clients).await,
    }
}
