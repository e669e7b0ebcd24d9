use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::clock::SystemClock;
use crate::config::KeyResolver;

mod app;
mod cli;
mod clock;
mod config;
mod message;
mod stopwatch;
mod theme;
mod tui;
mod ui;

pub use theme::Theme;

const APP_NAME: &str = "stopwatch-tui";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting {APP_NAME}");

    let args = cli::Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));

    let mut app = App::new(&config, resolver, Rc::new(SystemClock));
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join(APP_NAME).join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, format!("{APP_NAME}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
