// src/utils/mod.rs

pub mod config;
pub mod error;
pub mod helpers;
pub mod logger;
pub mod time;

// Re-export commonly used items
pub use config::EngineConfig;
pub use error::{ErrorKind, ShopError, ShopResult};
pub use helpers::*;
pub use logger::*;
pub use time::*;
