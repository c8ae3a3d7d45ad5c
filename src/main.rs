use eframe::{egui, NativeOptions};
use image::GenericImageView;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod desktop;
mod error;
mod flow;
mod models;
mod platform;
mod ui;

use app::LauncherApp;
use desktop::icons;
use models::{FileReference, LauncherConfig, StartupSignal, BOOT_PATH_ARG};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

    let signal = parse_args(std::env::args().skip(1));
    info!("Starting with {:?}", signal);

    let config_path = config::get_config_path();
    let mut config = if config_path.exists() {
        config::load_config(&config_path).unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            LauncherConfig::default()
        })
    } else {
        let config = LauncherConfig::default();
        if let Err(e) = config::save_config(&config, &config_path) {
            warn!("Failed to write default config: {}", e);
        }
        config
    };

    let data_dir = config::get_data_dir();
    // Window and shortcuts share this one resolved file
    let exe_dir = std::env::current_exe().ok().and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    config.default_icon = icons::resolve_default_icon(&config.default_icon, exe_dir.as_deref(), &data_dir);

    // Load icon for the application
    let icon_data = if let Ok(image) = image::open(&config.default_icon.0) {
        let (width, height) = image.dimensions();
        let rgba = image.to_rgba8().into_raw();
        Some(egui::IconData {
            rgba,
            width,
            height,
        })
    } else {
        None
    };

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
        .with_inner_size([520.0, 300.0])
        .with_icon(icon_data.unwrap_or_default()),
        ..Default::default()
    };

    let app = LauncherApp::new(config, data_dir, &signal);

    eframe::run_native(
        "Kenji Launcher",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}

/// `kenji-launcher [--boot-path <uri>] [<uri-or-path>]`
fn parse_args<I: Iterator<Item = String>>(mut args: I) -> StartupSignal {
    let mut signal = StartupSignal::default();

    while let Some(arg) = args.next() {
        if arg == BOOT_PATH_ARG {
            signal.boot_path = args.next();
        } else if let Some(value) = arg.strip_prefix(BOOT_PATH_ARG).and_then(|rest| rest.strip_prefix('=')) {
            signal.boot_path = Some(value.to_string());
        } else if signal.data.is_none() {
            signal.data = FileReference::from_arg(&arg);
            if signal.data.is_none() {
                warn!("Ignoring unusable argument: {}", arg);
            }
        }
    }

    signal
}
