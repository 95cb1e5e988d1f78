pub mod api;
pub mod config;
pub mod mcp;

pub use plan_core::{models, Catalog};
