//! Detail view: load one work and print its final state.

use anyhow::Result;
use catalog_core::DetailController;

use crate::app_config::EffectiveConfig;
use crate::output;

pub async fn run_show_command(id: &str, config: &EffectiveConfig) -> Result<()> {
    let source = super::catalog_source(config)?;
    let controller = DetailController::with_display_timeout(source, config.display_timeout);

    controller.activate(id).await;

    let width = output::terminal_width();
    for line in output::render_detail(&controller.state(), width) {
        println!("{line}");
    }
    Ok(())
}
