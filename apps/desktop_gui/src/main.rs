use std::{path::PathBuf, time::Duration};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::UserConsoleApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop console for a remote user-management API")]
struct Args {
    /// Overrides the configured user collection URL.
    #[arg(long)]
    api_base_url: Option<String>,
    /// TOML settings file; defaults to ./user_console.toml or the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut settings =
        shared::config::load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = api_base_url;
    }
    let notification_ttl = Duration::from_millis(settings.notification_ttl_ms);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("User Console")
            .with_inner_size([980.0, 680.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "User Console",
        options,
        Box::new(move |_cc| Ok(Box::new(UserConsoleApp::new(cmd_tx, ui_rx, notification_ttl)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop ui failed: {err}"))
}
