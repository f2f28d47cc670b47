use tickboard_core::news::HeadlineSource;
use tickboard_core::view::{Section, SectionBody, ViewModel};
use tickboard_core::UtcDateTime;

use crate::cli::NewsArgs;
use crate::commands::Clients;
use crate::error::CliError;

pub async fn run(args: &NewsArgs, clients: &Clients) -> Result<ViewModel, CliError> {
    let items = clients.news.top_headlines(args.limit).await;

    let mut view = ViewModel::new("Latest news", UtcDateTime::now());
    if items.is_empty() {
        view.push_unavailable("Latest news", "no headlines available right now");
    } else {
        view.push(Section::new("Latest news", SectionBody::Headlines { items }));
    }

    Ok(view)
}
