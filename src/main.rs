//! Canvas configuration check.
//!
//! Usage: `schemacanvas [--init] [CONFIG]`
//!
//! Loads the canvas configuration (the platform default path unless one is
//! given), validates it and reports the effective canvas parameters. With
//! `--init`, a missing file is written with the defaults.

mod args;

use anyhow::Context;
use args::Args;
use clap::Parser;
use schemacanvas::{init_logging, CanvasConfig, DiagramScene, SettingsPersistence};
use schemacanvas_scene::PrintPaginator;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;

    let path = match args.config {
        Some(path) => path,
        None => CanvasConfig::default_path().context("no default config location")?,
    };
    let existed = path.exists();

    let settings = SettingsPersistence::load_or_default(&path)?;
    settings
        .validate()
        .with_context(|| format!("invalid canvas configuration in {}", path.display()))?;

    if args.init && !existed {
        settings.save()?;
        tracing::info!("Wrote default canvas config to {}", path.display());
    }

    let config = settings.config();
    let scene = DiagramScene::new(config.clone());
    let page = PrintPaginator::new(&config.page, &config.print).page_size(1.0);

    tracing::info!(
        "Grid {} (align: {}), default layer '{}'",
        scene.grid_size(),
        config.grid.align_objects_to_grid,
        scene.layers()[0]
    );
    tracing::info!(
        "Printable page {:.1} x {:.1} at scale 1.0, scale range {}..{}",
        page.width,
        page.height,
        config.print.min_scale,
        config.print.max_scale
    );
    tracing::info!(
        "Auto-scroll {} (step {}, band {})",
        if config.interaction.corner_move {
            "on"
        } else {
            "off"
        },
        config.interaction.scroll_step,
        config.interaction.scroll_threshold
    );

    Ok(())
}
