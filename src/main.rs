mod app;
mod config;
mod domain;
mod models;
mod ui;

use anyhow::Context as _;
use clap::Parser;
use gpui::Application;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};
use crate::models::UciEngine;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from(Cli::parse());

    let engine = UciEngine::start(&config.engine, &config.engine_args)
        .with_context(|| format!("could not start chess engine {}", config.engine.display()))?;

    Application::new().run(move |cx| app::run(cx, engine, config));
    Ok(())
}
