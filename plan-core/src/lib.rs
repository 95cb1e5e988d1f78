//! Core library for Project Plan.
//!
//! Projects and their todos stored as independent records in a flat
//! key-value namespace, with the membership indexes kept alongside them.
//! Nothing here knows about the transport that invokes it.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use plan_core::models::*;
//! use plan_core::{Catalog, SqliteStore};
//!
//! let store = SqliteStore::open_default()?;
//! store.migrate()?;
//!
//! let catalog = Catalog::new(Arc::new(store));
//! let project = catalog.create_project(CreateProjectInput {
//!     name: "Launch".into(),
//!     description: None,
//! })?;
//! let _todos = catalog.list_all_todos(&project.id, StatusFilter::All)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod catalog;
pub mod error;
pub mod keys;
pub mod models;
pub mod store;

// Re-export commonly used types at crate root
pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use store::{KvStore, MemoryStore, SqliteStore};
