#![allow(dead_code)]

use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use raytray::TrayConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Roughly 60 frames per second.
pub const FRAME: Duration = Duration::from_millis(16);

pub fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(name)
}

/// The user's config file if there is one, otherwise `tooltip` and the bundled icon.
pub fn load_config(tooltip: &str) -> anyhow::Result<TrayConfig> {
    let path = TrayConfig::path()?;
    if path.exists() {
        return TrayConfig::from_file(&path);
    }

    Ok(TrayConfig::new(Some(asset("raytray.ico")), tooltip))
}

pub fn error_dialog<T: Display>(error: T) {
    rfd::MessageDialog::new()
        .set_title("raytray")
        .set_description(error.to_string())
        .set_level(rfd::MessageLevel::Error)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn init_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_env("RAYTRAY_LOG").unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::DEBUG.into())
            .from_env_lossy()
    });

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(tracing::Level::TRACE)
        .with_target(false)
        .with_env_filter(env_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!("Initialized Logger");

    Ok(())
}

/// Sets up logging and error reporting around a demo's `run`.
pub fn main(run: fn() -> anyhow::Result<()>) -> anyhow::Result<()> {
    init_logging()?;

    std::panic::set_hook(Box::new(|info| {
        tracing::error!("{info}");
        error_dialog(info);
    }));

    if let Err(e) = run() {
        tracing::error!("{e:#}");
        error_dialog(format!("{e:#}"));
        std::process::exit(1);
    }

    Ok(())
}
