//! API server entry point.

use std::path::PathBuf;

use anyhow::Context;

use kata_lib::problems::ProblemStore;
use kata_lib::server;

const BIND_ADDR: &str = "127.0.0.1:5123";

fn data_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir().context("could not determine platform data directory")?;
    Ok(base.join("kata"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let data_dir = data_dir()?;
    let store = ProblemStore::open(&data_dir)
        .with_context(|| format!("opening problem store in {:?}", data_dir))?;

    server::serve(store, BIND_ADDR).await
}
