use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use kata_lib::prefs::{FileStore, Prefs};
use kata_lib::problems::ProblemStore;
use kata_lib::review::DailyGate;

/// Shared application state for CLI commands
pub struct App {
    pub store: ProblemStore,
    pub prefs: Prefs<FileStore>,
    pub gate: DailyGate,
}

impl App {
    /// Initialize from the given or default data directory
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir()?,
        };

        let store = ProblemStore::open(&data_dir)
            .with_context(|| format!("Failed to open problem store in {:?}", data_dir))?;
        let prefs = Prefs::new(FileStore::new(data_dir.join("prefs.json")));

        Ok(Self {
            store,
            prefs,
            gate: DailyGate::default(),
        })
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Failed to get data directory")?;
    Ok(base.join("kata"))
}
