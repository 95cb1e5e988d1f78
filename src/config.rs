//! Runtime configuration resolved from the command line and environment.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use plan_core::{KvStore, MemoryStore, SqliteStore};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Args)]
pub struct StoreArgs {
    /// Path to the SQLite store (defaults to the platform data directory)
    #[arg(long, env = "PROJECT_PLAN_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Keep everything in memory; takes precedence over --db
    #[arg(long, global = true)]
    pub memory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite(PathBuf),
}

impl StoreConfig {
    pub fn from_args(args: &StoreArgs) -> Result<Self> {
        if args.memory {
            return Ok(Self::Memory);
        }
        let path = match &args.db {
            Some(path) => path.clone(),
            None => SqliteStore::default_path()?,
        };
        Ok(Self::Sqlite(path))
    }

    /// Opens the backend, running migrations where it has any.
    pub fn open(&self) -> Result<Arc<dyn KvStore>> {
        match self {
            Self::Memory => {
                tracing::warn!("Using in-memory store; data is lost on exit");
                Ok(Arc::new(MemoryStore::new()))
            }
            Self::Sqlite(path) => {
                let store = SqliteStore::open(path)?;
                store.migrate()?;
                tracing::info!("Using store at {}", path.display());
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_flag_wins_over_db_path() {
        let args = StoreArgs {
            db: Some(PathBuf::from("/tmp/ignored.db")),
            memory: true,
        };
        assert_eq!(StoreConfig::from_args(&args).unwrap(), StoreConfig::Memory);
    }

    #[test]
    fn explicit_db_path_is_used() {
        let args = StoreArgs {
            db: Some(PathBuf::from("/tmp/plan.db")),
            memory: false,
        };
        assert_eq!(
            StoreConfig::from_args(&args).unwrap(),
            StoreConfig::Sqlite(PathBuf::from("/tmp/plan.db"))
        );
    }

    #[test]
    fn opens_sqlite_store_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::Sqlite(dir.path().join("plan.db"));
        let store = config.open().unwrap();
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
