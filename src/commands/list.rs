//! List view: load a subject, apply filters through the search channel, print.

use std::sync::Arc;

use anyhow::Result;
use catalog_core::{ListingController, SearchChannel, SearchInput};
use tracing::debug;

use crate::app_config::EffectiveConfig;
use crate::cli::ListArgs;
use crate::output;

pub async fn run_list_command(args: &ListArgs, config: &EffectiveConfig) -> Result<()> {
    let source = super::catalog_source(config)?;
    let subject = args.subject.as_deref().unwrap_or(&config.subject);

    let channel = Arc::new(SearchChannel::new());
    let input = SearchInput::new(Arc::clone(&channel));
    let controller = ListingController::with_subject(source, Arc::clone(&channel), subject);
    let mut subscription = controller.subscribe_filters();

    controller.activate().await;

    if let Some(title) = &args.title
        && !input.submit_title(title)
    {
        debug!("Blank title ignored");
    }
    if args.year.is_some() {
        input.submit_year(args.year);
    }
    input.change_sort(args.sort);
    debug!(filters = ?channel.snapshot(), "Applying filters");
    controller.drain(&mut subscription).await;

    let width = output::terminal_width();
    for line in output::render_listing(&controller.view(), width) {
        println!("{line}");
    }
    Ok(())
}
