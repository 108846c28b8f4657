#![forbid(unsafe_code)]

mod config;
mod logging;
mod terminal;

use anyhow::Context;
use services::{AppServices, Clock};
use storage::InMemoryRepository;
use storage::demo::seed_demo;

use crate::config::{AppConfig, Backend};

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    logging::init_tracing(&config.log_filter);

    let clock = Clock::default();
    let offline = config.backend == Backend::Offline;
    let app = match config.backend {
        Backend::Offline => {
            let repo = InMemoryRepository::with_clock(clock);
            seed_demo(&repo).await.context("failed to seed demo data")?;
            AppServices::in_memory(repo, clock)
        }
        Backend::Rest(rest) => {
            tracing::info!(api = %rest.base_url, timeout = ?rest.timeout, "using REST backend");
            AppServices::rest(rest, clock)?
        }
    };

    terminal::run(app, config.token, offline).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
