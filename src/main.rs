mod app;
mod filter;
mod layout;
mod lineage;
mod scene;
mod util;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use thiserror::Error;
use tracing::error;

use layout::LayoutConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON dataset with nodes, links, categories and linkTypes.
    #[arg(long, default_value = "assets/data/models.json")]
    data: PathBuf,
    /// Start with the light theme.
    #[arg(long)]
    light: bool,
    #[arg(long, default_value_t = 1440.0)]
    width: f32,
    #[arg(long, default_value_t = 920.0)]
    height: f32,
}

/// The native window or its graphics surface could not be created.
#[derive(Debug, Error)]
#[error("no render target available: {0}")]
struct RenderTargetMissing(String);

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(panic = %info, "unrecoverable fault");
        default_hook(info);
    }));
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    install_panic_hook();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_title("Generative Model Lineage"),
        ..Default::default()
    };

    let data_path = args.data.clone();
    let start_light = args.light;
    eframe::run_native(
        "model-lineage",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::LineageApp::new(
                cc,
                data_path,
                LayoutConfig::default(),
                start_light,
            )))
        }),
    )
    .map_err(|source| RenderTargetMissing(source.to_string()))
    .context("failed to open the lineage window")?;

    Ok(())
}
